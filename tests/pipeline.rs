mod common;

mod tests {
    use super::common::*;
    use pov_painter::{
        CapacityError, ChannelOrder, Duration, Error, FormatError, FrameEncoder, ImagePipeline,
        LoadRequest, PlaybackBudget, RowLayout,
    };

    const IMAGE: &str = "/images/a.bmp";
    const STREAM: &str = "/led.dat";

    fn pipeline(pixel_count: usize) -> ImagePipeline {
        let layout = RowLayout::new(pixel_count).unwrap();
        ImagePipeline::new(FrameEncoder::new(layout, ChannelOrder::Rgb, 1.0))
    }

    fn request(rows: u32, looping: bool) -> LoadRequest<'static> {
        LoadRequest {
            image_path: IMAGE,
            target_path: STREAM,
            budget: PlaybackBudget {
                draw_duration: Duration::from_millis(700),
                rows_per_second: 0,
                num_rows: rows,
            },
            brightness: 1.0,
            looping,
        }
    }

    #[test]
    fn test_persists_encoded_rows() {
        let mut storage = MemStorage::new();
        storage.insert(IMAGE, gradient_bmp(4, 6));
        let mut pipeline = pipeline(4);
        let layout = pipeline.encoder().layout();
        let mut progress = Vec::new();

        let rows = pipeline
            .load(&mut storage, &request(100, false), &mut |f| progress.push(f))
            .unwrap();

        assert_eq!(rows, 6);
        let data = storage.file(STREAM).unwrap();
        assert_eq!(data.len(), 6 * layout.row_len());
        for (index, row) in data.chunks(layout.row_len()).enumerate() {
            assert_eq!(&row[..4], &[0; 4]);
            assert_eq!(layout.pixel(row, 2), [(index * 10) as u8, 20, 200]);
        }
        assert_eq!(progress.len(), 6);
        assert_eq!(progress.last(), Some(&1.0));
    }

    #[test]
    fn test_budget_limits_rows() {
        let mut storage = MemStorage::new();
        storage.insert(IMAGE, gradient_bmp(4, 6));
        let mut pipeline = pipeline(4);

        let rows = pipeline
            .load(&mut storage, &request(3, false), &mut |_| {})
            .unwrap();
        assert_eq!(rows, 3);
        assert_eq!(storage.file(STREAM).unwrap().len(), 3 * 21);
    }

    #[test]
    fn test_looping_wraps_image_rows() {
        let mut storage = MemStorage::new();
        storage.insert(IMAGE, gradient_bmp(4, 3));
        let mut pipeline = pipeline(4);
        let layout = pipeline.encoder().layout();

        let rows = pipeline
            .load(&mut storage, &request(7, true), &mut |_| {})
            .unwrap();
        assert_eq!(rows, 7);
        let data = storage.file(STREAM).unwrap();
        let row = |index: usize| &data[index * layout.row_len()..(index + 1) * layout.row_len()];
        assert_eq!(row(3), row(0));
        assert_eq!(row(6), row(0));
        assert_ne!(row(1), row(0));
    }

    #[test]
    fn test_invalid_image_keeps_old_stream() {
        let mut storage = MemStorage::new();
        let mut data = gradient_bmp(4, 3);
        data[1] = b'A';
        storage.insert(IMAGE, data);
        storage.insert(STREAM, vec![7; 42]);

        let result = pipeline(4).load(&mut storage, &request(10, false), &mut |_| {});
        assert!(matches!(result, Err(Error::Format(FormatError::Signature))));
        assert_eq!(storage.file(STREAM), Some(vec![7; 42]));
    }

    #[test]
    fn test_truncated_image_keeps_old_stream() {
        let mut storage = MemStorage::new();
        let data = gradient_bmp(4, 6);
        storage.insert(IMAGE, data[..54 + 37].to_vec());
        storage.insert(STREAM, vec![7; 42]);

        let result = pipeline(4).load(&mut storage, &request(10, false), &mut |_| {});
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::TruncatedPixels { .. }))
        ));
        assert_eq!(storage.file(STREAM), Some(vec![7; 42]));
    }

    #[test]
    fn test_capacity_checked_before_writing() {
        let mut storage = MemStorage::new();
        storage.insert(IMAGE, gradient_bmp(4, 20));
        storage.insert(STREAM, vec![7; 42]);
        let used = storage.file(IMAGE).unwrap().len() as u64 + 42;
        // old stream is reclaimable: 42 + 100 bytes, 20 rows of 21 need 420
        storage.set_capacity(used + 100);

        let result = pipeline(4).load(&mut storage, &request(20, false), &mut |_| {});
        assert_eq!(
            result,
            Err(Error::Capacity(CapacityError::Storage {
                required: 420,
                available: 142,
            }))
        );
        assert_eq!(storage.file(STREAM), Some(vec![7; 42]));

        // 6 rows fit
        let rows = pipeline(4)
            .load(&mut storage, &request(6, false), &mut |_| {})
            .unwrap();
        assert_eq!(rows, 6);
        assert_eq!(storage.file(STREAM).unwrap().len(), 126);
    }

    #[test]
    fn test_read_only_storage() {
        let mut storage = MemStorage::new();
        storage.insert(IMAGE, gradient_bmp(4, 3));
        storage.insert(STREAM, vec![7; 42]);
        storage.set_read_only(true);

        let result = pipeline(4).load(&mut storage, &request(3, false), &mut |_| {});
        assert_eq!(result, Err(Error::ReadOnlyStorage));
        assert_eq!(storage.file(STREAM), Some(vec![7; 42]));
    }
}
