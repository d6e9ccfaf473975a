mod common;

mod tests {
    use super::common::*;
    use pov_painter::catalog::MAX_IMAGES;
    use pov_painter::storage::ERRNO_IO;
    use pov_painter::{
        ImageCatalog, Storage, StorageError, StorageErrorKind, StorageFile,
    };

    #[test]
    fn test_eligible_names() {
        assert!(ImageCatalog::is_eligible("heart.bmp"));
        assert!(ImageCatalog::is_eligible("LOGO.BMP"));
        assert!(!ImageCatalog::is_eligible(".bmp"));
        assert!(!ImageCatalog::is_eligible(".hidden.bmp"));
        assert!(!ImageCatalog::is_eligible("._heart.bmp"));
        assert!(!ImageCatalog::is_eligible("notes.txt"));
        assert!(!ImageCatalog::is_eligible("bmp"));
    }

    #[test]
    fn test_scan_sorts_and_filters() {
        let mut storage = MemStorage::new();
        for name in ["c.bmp", "a.bmp", "readme.txt", "._a.bmp", "B.BMP"] {
            storage.insert(&format!("/images/{name}"), vec![0]);
        }
        storage.insert("/other/d.bmp", vec![0]);

        let catalog = ImageCatalog::scan(&mut storage, "/images").unwrap();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, ["B.BMP", "a.bmp", "c.bmp"]);
        assert_eq!(catalog.current(), Some("B.BMP"));
    }

    #[test]
    fn test_missing_folder_is_empty() {
        let mut storage = MemStorage::new();
        let mut catalog = ImageCatalog::scan(&mut storage, "/images").unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.current(), None);
        assert_eq!(catalog.advance(), None);
    }

    #[test]
    fn test_advance_wraps() {
        let mut catalog = ImageCatalog::from_names(["a.bmp", "b.bmp", "c.bmp"]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.current_index(), 0);
        assert_eq!(catalog.advance(), Some("b.bmp"));
        assert_eq!(catalog.current_index(), 1);
        assert_eq!(catalog.advance(), Some("c.bmp"));
        assert_eq!(catalog.advance(), Some("a.bmp"));
        assert_eq!(catalog.current_index(), 0);
    }

    #[test]
    fn test_capacity_bound() {
        let names: Vec<String> = (0..MAX_IMAGES + 5).map(|i| format!("{i:03}.bmp")).collect();
        let catalog = ImageCatalog::from_names(names.iter().map(String::as_str));
        assert_eq!(catalog.len(), MAX_IMAGES);

        let long = format!("{}.bmp", "x".repeat(60));
        assert!(ImageCatalog::from_names([long.as_str()]).is_empty());
    }

    struct BrokenStorage;

    struct NoFile;

    impl StorageFile for NoFile {
        fn seek(&mut self, _position: u64) -> Result<(), StorageError> {
            Err(StorageError::io(ERRNO_IO))
        }

        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, StorageError> {
            Err(StorageError::io(ERRNO_IO))
        }

        fn write(&mut self, _data: &[u8]) -> Result<usize, StorageError> {
            Err(StorageError::io(ERRNO_IO))
        }

        fn size(&mut self) -> Result<u64, StorageError> {
            Err(StorageError::io(ERRNO_IO))
        }
    }

    impl Storage for BrokenStorage {
        type File = NoFile;

        fn open(&mut self, _path: &str) -> Result<NoFile, StorageError> {
            Err(StorageError::io(ERRNO_IO))
        }

        fn create(&mut self, _path: &str) -> Result<NoFile, StorageError> {
            Err(StorageError::io(ERRNO_IO))
        }

        fn list(&mut self, _dir: &str, _visit: &mut dyn FnMut(&str)) -> Result<(), StorageError> {
            Err(StorageError::io(ERRNO_IO))
        }

        fn free_space(&mut self) -> Result<u64, StorageError> {
            Ok(0)
        }

        fn probe_writable(&mut self) -> Result<bool, StorageError> {
            Ok(false)
        }
    }

    #[test]
    fn test_listing_failure_propagates() {
        let error = ImageCatalog::scan(&mut BrokenStorage, "/images").unwrap_err();
        assert_eq!(error.kind, StorageErrorKind::Other);
        assert_eq!(error.code, ERRNO_IO);
    }
}
