#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::Rc;

use embassy_time::Duration;
use pov_painter::input::InputSubsystem;
use pov_painter::{
    Accelerometer, ButtonInput, PainterConfig, Rgb, Storage, StorageError, StorageFile,
    StripTransport, TouchConfig, TouchSensor,
};

#[derive(Default)]
struct Volume {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    read_only: bool,
    capacity: Option<u64>,
    create_error: Option<i32>,
}

impl Volume {
    fn used(&self) -> u64 {
        self.files.values().map(|data| data.len() as u64).sum()
    }
}

/// RAM filesystem shared between the test and the code under test
#[derive(Clone, Default)]
pub struct MemStorage {
    volume: Rc<RefCell<Volume>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, data: Vec<u8>) {
        let mut volume = self.volume.borrow_mut();
        if let Some((dir, _)) = path.rsplit_once('/') {
            volume.dirs.insert(dir.to_string());
        }
        volume.files.insert(path.to_string(), data);
    }

    pub fn add_dir(&self, dir: &str) {
        self.volume.borrow_mut().dirs.insert(dir.to_string());
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.volume.borrow().files.get(path).cloned()
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.volume.borrow_mut().read_only = read_only;
    }

    /// Limit the total bytes stored across all files
    pub fn set_capacity(&self, capacity: u64) {
        self.volume.borrow_mut().capacity = Some(capacity);
    }

    /// Make every `create` fail with an I/O error carrying `code`
    pub fn fail_create(&self, code: i32) {
        self.volume.borrow_mut().create_error = Some(code);
    }
}

pub struct MemFile {
    volume: Rc<RefCell<Volume>>,
    path: String,
    position: usize,
}

impl StorageFile for MemFile {
    fn seek(&mut self, position: u64) -> Result<(), StorageError> {
        self.position = position as usize;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let volume = self.volume.borrow();
        let data = volume
            .files
            .get(&self.path)
            .ok_or_else(StorageError::not_found)?;
        if self.position >= data.len() {
            return Ok(0);
        }
        let count = buf.len().min(data.len() - self.position);
        buf[..count].copy_from_slice(&data[self.position..self.position + count]);
        self.position += count;
        Ok(count)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, StorageError> {
        let mut volume = self.volume.borrow_mut();
        if volume.read_only {
            return Err(StorageError::read_only());
        }
        let room = match volume.capacity {
            Some(capacity) => capacity.saturating_sub(volume.used()) as usize,
            None => usize::MAX,
        };
        let file = volume
            .files
            .get_mut(&self.path)
            .ok_or_else(StorageError::not_found)?;
        let end = self.position + data.len();
        let growth = end.saturating_sub(file.len());
        let count = if growth > room {
            data.len() - (growth - room)
        } else {
            data.len()
        };
        let end = self.position + count;
        if end > file.len() {
            file.resize(end, 0);
        }
        file[self.position..end].copy_from_slice(&data[..count]);
        self.position = end;
        Ok(count)
    }

    fn size(&mut self) -> Result<u64, StorageError> {
        let volume = self.volume.borrow();
        let data = volume
            .files
            .get(&self.path)
            .ok_or_else(StorageError::not_found)?;
        Ok(data.len() as u64)
    }
}

impl Storage for MemStorage {
    type File = MemFile;

    fn open(&mut self, path: &str) -> Result<MemFile, StorageError> {
        if !self.volume.borrow().files.contains_key(path) {
            return Err(StorageError::not_found());
        }
        Ok(MemFile {
            volume: Rc::clone(&self.volume),
            path: path.to_string(),
            position: 0,
        })
    }

    fn create(&mut self, path: &str) -> Result<MemFile, StorageError> {
        let mut volume = self.volume.borrow_mut();
        if volume.read_only {
            return Err(StorageError::read_only());
        }
        if let Some(code) = volume.create_error {
            return Err(StorageError::io(code));
        }
        volume.files.insert(path.to_string(), Vec::new());
        Ok(MemFile {
            volume: Rc::clone(&self.volume),
            path: path.to_string(),
            position: 0,
        })
    }

    fn list(&mut self, dir: &str, visit: &mut dyn FnMut(&str)) -> Result<(), StorageError> {
        let volume = self.volume.borrow();
        if !volume.dirs.contains(dir) {
            return Err(StorageError::not_found());
        }
        for path in volume.files.keys() {
            if let Some((parent, name)) = path.rsplit_once('/') {
                if parent == dir {
                    visit(name);
                }
            }
        }
        Ok(())
    }

    fn free_space(&mut self) -> Result<u64, StorageError> {
        let volume = self.volume.borrow();
        Ok(match volume.capacity {
            Some(capacity) => capacity.saturating_sub(volume.used()),
            None => u64::from(u32::MAX),
        })
    }

    fn probe_writable(&mut self) -> Result<bool, StorageError> {
        Ok(!self.volume.borrow().read_only)
    }
}

/// Strip that records every write
#[derive(Clone, Default)]
pub struct RecordingStrip {
    writes: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl RecordingStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.borrow().clone()
    }

    pub fn last(&self) -> Option<Vec<u8>> {
        self.writes.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.writes.borrow().len()
    }

    pub fn clear(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl StripTransport for RecordingStrip {
    fn write(&mut self, bytes: &[u8]) {
        self.writes.borrow_mut().push(bytes.to_vec());
    }
}

/// Accelerometer replaying queued Y readings, resting at 0 afterwards
#[derive(Clone, Default)]
pub struct ScriptedAccel {
    readings: Rc<RefCell<VecDeque<f32>>>,
}

impl ScriptedAccel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, y: f32) {
        self.readings.borrow_mut().push_back(y);
    }
}

impl Accelerometer for ScriptedAccel {
    fn acceleration(&mut self) -> [f32; 3] {
        let y = self.readings.borrow_mut().pop_front().unwrap_or(0.0);
        [0.0, y, 9.81]
    }
}

#[derive(Clone, Default)]
pub struct SharedTouch {
    raw: Rc<Cell<u16>>,
}

impl SharedTouch {
    pub fn new(raw: u16) -> Self {
        let touch = Self::default();
        touch.set(raw);
        touch
    }

    pub fn set(&self, raw: u16) {
        self.raw.set(raw);
    }
}

impl TouchSensor for SharedTouch {
    fn raw_value(&mut self) -> u16 {
        self.raw.get()
    }
}

#[derive(Clone, Default)]
pub struct SharedButton {
    pressed: Rc<Cell<bool>>,
}

impl SharedButton {
    pub fn set(&self, pressed: bool) {
        self.pressed.set(pressed);
    }
}

impl ButtonInput for SharedButton {
    fn is_pressed(&mut self) -> bool {
        self.pressed.get()
    }
}

pub type TestInput = InputSubsystem<SharedTouch, SharedButton>;

pub fn test_input(touch: &[SharedTouch], button: &SharedButton, config: &TouchConfig) -> TestInput {
    InputSubsystem::new(touch.iter().cloned(), button.clone(), config)
}

/// Defaults with every delay shortened for host tests
pub fn test_config(pixel_count: usize) -> PainterConfig {
    let mut config = PainterConfig::default();
    config.hardware.pixel_count = pixel_count;
    config.touch.debounce_interval = Duration::from_ticks(0);
    config.motion.arm_delay = Duration::from_millis(1);
    config.motion.settle_delay = Duration::from_millis(1);
    config.playback.benchmark_window = Duration::from_millis(20);
    config.playback.column_delay = Duration::from_ticks(0);
    config.playback.exclusive_stroke = false;
    config
}

/// Encode a 24-bit BMP; `pixel(row, column)` gives the color with row 0 at the top
pub fn bmp(width: u32, height: u32, top_down: bool, pixel: impl Fn(u32, u32) -> Rgb) -> Vec<u8> {
    let stride = ((width * 3 + 3) & !3) as usize;
    let pixel_bytes = stride * height as usize;
    let file_size = 54 + pixel_bytes;

    let mut data = Vec::with_capacity(file_size);
    data.extend_from_slice(b"BM");
    data.extend_from_slice(&(file_size as u32).to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&54u32.to_le_bytes());
    data.extend_from_slice(&40u32.to_le_bytes());
    data.extend_from_slice(&(width as i32).to_le_bytes());
    let stored_height = if top_down {
        -(height as i32)
    } else {
        height as i32
    };
    data.extend_from_slice(&stored_height.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&24u16.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&(pixel_bytes as u32).to_le_bytes());
    data.extend_from_slice(&[0; 16]);

    for stored in 0..height {
        let row = if top_down { stored } else { height - 1 - stored };
        let start = data.len();
        for column in 0..width {
            let color = pixel(row, column);
            data.extend_from_slice(&[color.b, color.g, color.r]);
        }
        data.resize(start + stride, 0);
    }
    data
}

/// Image whose pixel encodes its own position
pub fn gradient_bmp(width: u32, height: u32) -> Vec<u8> {
    bmp(width, height, false, |row, column| Rgb {
        r: (row * 10) as u8,
        g: (column * 10) as u8,
        b: 200,
    })
}

pub fn patch_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub fn patch_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
