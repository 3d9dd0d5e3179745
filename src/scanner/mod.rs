//! 画像の収集と読み込み
//!
//! アップロード対象（ファイル・フォルダ）から画像を集め、
//! Data URL形式に変換する。

use crate::error::{ParkingScanError, Result};
use parking_scan_common::data_url::{is_image_extension, mime_for_extension};
use parking_scan_common::ImageDataUrl;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

impl ImageInfo {
    fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            file_name,
        }
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

/// 指定パスから画像を集める
///
/// ファイルは引数の順序のまま、フォルダは直下の画像をファイル名順で展開する。
pub fn collect_images(paths: &[PathBuf]) -> Result<Vec<ImageInfo>> {
    let mut images = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(ParkingScanError::FileNotFound(path.display().to_string()));
        }

        if path.is_file() {
            if has_image_extension(path) {
                images.push(ImageInfo::from_path(path));
            } else {
                tracing::warn!("画像ではないためスキップ: {}", path.display());
            }
            continue;
        }

        let mut found: Vec<ImageInfo> = WalkDir::new(path)
            .max_depth(1)  // 直下のみ（再帰しない）
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && has_image_extension(e.path()))
            .map(|e| ImageInfo::from_path(e.path()))
            .collect();

        // ファイル名でソート
        found.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        images.extend(found);
    }

    Ok(images)
}

/// 画像ファイル全体を読み込み、Data URLに変換（再圧縮しない）
pub async fn load_image(path: &Path) -> Result<ImageDataUrl> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ParkingScanError::Read(format!("{}: {}", path.display(), e)))?;

    let mime = path
        .extension()
        .map(|ext| mime_for_extension(&ext.to_string_lossy()))
        .unwrap_or(parking_scan_common::data_url::UNKNOWN_MIME);

    Ok(ImageDataUrl::encode(mime, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;

    #[test]
    fn test_collect_not_found() {
        let result = collect_images(&[PathBuf::from("/nonexistent/receipt.jpg")]);
        assert!(matches!(result, Err(ParkingScanError::FileNotFound(_))));
    }

    #[test]
    fn test_collect_folder_with_images() {
        let temp_dir = tempfile::tempdir().unwrap();

        File::create(temp_dir.path().join("c.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.path().join("a.PNG")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.path().join("b.webp")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.path().join("readme.txt")).unwrap().write_all(b"text").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        File::create(temp_dir.path().join("nested").join("d.jpg")).unwrap();

        let result = collect_images(&[temp_dir.path().to_path_buf()]).unwrap();
        let names: Vec<&str> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.PNG", "b.webp", "c.jpg"]);
    }

    #[test]
    fn test_collect_files_keep_argument_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let z = temp_dir.path().join("z.jpg");
        let a = temp_dir.path().join("a.jpg");
        let txt = temp_dir.path().join("note.txt");
        File::create(&z).unwrap();
        File::create(&a).unwrap();
        File::create(&txt).unwrap();

        let result = collect_images(&[z, txt, a]).unwrap();
        let names: Vec<&str> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["z.jpg", "a.jpg"]);
    }

    #[tokio::test]
    async fn test_load_image_keeps_bytes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("receipt.JPG");
        fs::write(&path, b"\xff\xd8\xff raw jpeg").unwrap();

        let url = load_image(&path).await.unwrap();
        assert_eq!(url.mime(), "image/jpeg");
        assert_eq!(url.decode().unwrap(), b"\xff\xd8\xff raw jpeg");
    }

    #[tokio::test]
    async fn test_load_image_read_error() {
        let result = load_image(Path::new("/nonexistent/receipt.png")).await;
        assert!(matches!(result, Err(ParkingScanError::Read(_))));
    }
}
