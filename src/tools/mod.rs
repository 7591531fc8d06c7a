use crate::error::VerificationFailure;
use crate::pipeline::Verification;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Read an encoded image file into memory.
pub fn load_image_bytes<P: AsRef<Path>>(path: P) -> io::Result<Vec<u8>> {
    fs::read(path)
}

/// Iterate image paths under `root` (recursively, sorted) with an optional limit.
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
) -> impl Iterator<Item = PathBuf> {
    let mut images = Vec::new();
    walk(root.as_ref(), &mut images);
    images.sort();
    images.into_iter().take(limit.unwrap_or(usize::MAX))
}

/// Depth-first walk; unreadable directories are skipped.
fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            walk(&path, out);
        } else if has_image_extension(&path) {
            out.push(path);
        }
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Outcome counts over a batch of verifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub decoded: usize,
    /// Failure counts keyed by `stage: error kind`.
    pub failures: BTreeMap<String, usize>,
}

impl BatchSummary {
    pub fn record(&mut self, result: &Result<Verification, VerificationFailure>) {
        self.total += 1;
        match result {
            Ok(_) => self.decoded += 1,
            Err(failure) => {
                let key = format!("{}: {}", failure.stage, failure.error.kind_name());
                *self.failures.entry(key).or_default() += 1;
            }
        }
    }

    /// Percentage of inputs that produced a record.
    pub fn reading_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.decoded as f64 * 100.0 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Stage, VerificationError};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before UNIX epoch")
            .as_nanos();
        let sequence = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        path.push(format!("aadhaar_qr_dataset_{nanos}_{sequence}"));
        fs::create_dir_all(&path).expect("failed to create temp dir");
        path
    }

    #[test]
    fn dataset_iter_finds_images_recursively_sorted() {
        let root = temp_dir();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("b.PNG"), b"x").unwrap();
        fs::write(root.join("a.jpg"), b"x").unwrap();
        fs::write(root.join("notes.txt"), b"x").unwrap();
        fs::write(root.join("nested").join("c.jpeg"), b"x").unwrap();

        let found: Vec<PathBuf> = dataset_iter(&root, None).collect();
        assert_eq!(
            found,
            vec![root.join("a.jpg"), root.join("b.PNG"), root.join("nested").join("c.jpeg")]
        );
        assert_eq!(dataset_iter(&root, Some(1)).count(), 1);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn image_extension_match_ignores_case() {
        assert!(has_image_extension(Path::new("scan.JPEG")));
        assert!(has_image_extension(Path::new("dir/a.webp")));
        assert!(!has_image_extension(Path::new("notes.txt")));
        assert!(!has_image_extension(Path::new("png")));
    }

    #[test]
    fn dataset_iter_missing_root_is_empty() {
        assert_eq!(dataset_iter("/definitely/not/here", None).count(), 0);
    }

    #[test]
    fn batch_summary_counts() {
        let mut summary = BatchSummary::default();
        summary.record(&Err(VerificationFailure::new(Stage::ReadQr, VerificationError::NoQrFound)));
        summary.record(&Err(VerificationFailure::new(Stage::ReadQr, VerificationError::NoQrFound)));
        assert_eq!(summary.total, 2);
        assert_eq!(summary.failures.get("read_qr: no_qr_found"), Some(&2));
        assert_eq!(summary.reading_rate(), 0.0);
    }
}
