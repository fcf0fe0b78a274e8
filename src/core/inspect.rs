use crate::domain::model::PayloadKind;
use crate::utils::error::Result;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OPENDOCUMENT_PREFIX: &str = "application/vnd.oasis.opendocument";

/// Classifies a blend payload. Never fails: unreadable archives count as `NotArchive`.
pub fn inspect_payload(bytes: &[u8]) -> PayloadKind {
    if !bytes.starts_with(ZIP_MAGIC) {
        return PayloadKind::NotArchive;
    }

    match read_archive(bytes) {
        Ok(kind) => kind,
        Err(e) => {
            tracing::debug!("Payload starts like a zip archive but cannot be read: {}", e);
            PayloadKind::NotArchive
        }
    }
}

fn read_archive(bytes: &[u8]) -> Result<PayloadKind> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mimetype = match archive.by_name("mimetype") {
        Ok(mut entry) => {
            let mut content = String::new();
            entry.read_to_string(&mut content).ok().map(|_| content)
        }
        Err(_) => None,
    };

    Ok(match mimetype {
        Some(mimetype) if mimetype.trim().starts_with(OPENDOCUMENT_PREFIX) => {
            PayloadKind::OpenDocument {
                mimetype: mimetype.trim().to_string(),
            }
        }
        _ => PayloadKind::ZipArchive {
            entries: archive.len(),
        },
    })
}

/// Output extensions that promise an OpenDocument archive.
pub fn expects_opendocument(output_path: &str) -> bool {
    std::path::Path::new(output_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ods" | "odt" | "odp"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::{FileOptions, ZipWriter};

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            zip.start_file::<_, ()>(*name, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_opendocument_spreadsheet_is_recognized() {
        let bytes = build_zip(&[
            ("mimetype", "application/vnd.oasis.opendocument.spreadsheet"),
            ("content.xml", "<office:document-content/>"),
        ]);
        assert_eq!(
            inspect_payload(&bytes),
            PayloadKind::OpenDocument {
                mimetype: "application/vnd.oasis.opendocument.spreadsheet".to_string()
            }
        );
    }

    #[test]
    fn test_plain_zip_reports_entry_count() {
        let bytes = build_zip(&[("output.csv", "a,b"), ("output.tsv", "a\tb")]);
        assert_eq!(inspect_payload(&bytes), PayloadKind::ZipArchive { entries: 2 });
    }

    #[test]
    fn test_error_text_and_truncated_zip_are_not_archives() {
        assert_eq!(
            inspect_payload(b"invalid utf-8 sequence of 1 bytes from index 10"),
            PayloadKind::NotArchive
        );
        assert_eq!(inspect_payload(&[0x50, 0x4B, 0x03, 0x04, 0x00]), PayloadKind::NotArchive);
    }

    #[test]
    fn test_expects_opendocument() {
        assert!(expects_opendocument("out.ods"));
        assert!(expects_opendocument("reports/OUT.ODS"));
        assert!(!expects_opendocument("out.txt"));
        assert!(!expects_opendocument("out"));
    }
}
