use chrono::{ DateTime, Local };
use indicatif::{ ProgressBar, ProgressStyle };
use std::{ fs, io::Error, time::SystemTime };
use uuid::Uuid;

use crate::eon_core::parameters::{ PB_CHARS, PB_TEMPLATES };

/// ファイル名を指定し、ファイルをString形式で読み込む
/// Result型なので、この関数の外側でエラーハンドリングを行うこと
pub fn read_file(filepath: &str) -> Result<String, Error> {
    let file_contents = fs::read_to_string(filepath)?;
    Ok(file_contents)
}

/// タイムスタンプとUUIDの一部を使用し、IDを生成する
/// 形式は、%Y%m%d/%H%M%S_UUID末尾8文字
pub fn generate_id() -> String {
    let timestamp: DateTime<Local> = SystemTime::now().into();
    let uuid = Uuid::now_v7().simple().to_string();

    format!("{}_{}", timestamp.format("%Y%m%d/%H%M%S"), &uuid[uuid.len() - 8..])
}

/// Bar in the shared style. A broken template falls back to the default.
pub fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(PB_TEMPLATES) {
        pb.set_style(style.progress_chars(PB_CHARS));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_has_date_dir_and_suffix() {
        let id = generate_id();
        let (date, rest) = id.split_once('/').unwrap();
        assert_eq!(date.len(), 8);
        assert_eq!(rest.len(), "HHMMSS_".len() + 8);
        assert_ne!(generate_id(), generate_id());
    }
}
