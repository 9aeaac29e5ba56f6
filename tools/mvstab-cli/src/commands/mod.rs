pub mod config;
pub mod info;
pub mod simulate;
pub mod stabilize;

use std::path::Path;

use anyhow::Context;
use mvstab_common::StabError;
use mvstab_field_model::{parse_sequence, FieldSequence};

/// Read and validate a field sequence file.
pub fn load_sequence(path: &Path) -> anyhow::Result<FieldSequence> {
    if !path.exists() {
        return Err(StabError::file_not_found(path).into());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let sequence = parse_sequence(&content)
        .with_context(|| format!("Failed to parse field sequence {}", path.display()))?;
    sequence
        .validate()
        .with_context(|| format!("Invalid field sequence {}", path.display()))?;
    Ok(sequence)
}

/// Write a field sequence as JSON.
pub fn write_sequence(path: &Path, sequence: &FieldSequence) -> anyhow::Result<()> {
    let json = serde_json::to_string(sequence)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvstab_field_model::{MotionField, Vec2};

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("mvstab-cli-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_sequence(&scratch_path("missing.json")).unwrap_err();
        let err = err.downcast::<StabError>().unwrap();
        assert!(matches!(err, StabError::FileNotFound { .. }));
    }

    #[test]
    fn test_written_sequence_loads_back() {
        let path = scratch_path("sequence.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        let mut sequence = FieldSequence::new(3, 2);
        sequence
            .push(&MotionField::filled(3, 2, Vec2::new(0.5, -0.25), 0.8))
            .unwrap();
        write_sequence(&path, &sequence).unwrap();

        let loaded = load_sequence(&path).unwrap();
        assert_eq!(loaded, sequence);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_truncated_frame_is_rejected() {
        let path = scratch_path("truncated.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"width":2,"height":2,"frames":[{"motion":[[0,0]],"confidence":[1,1,1,1]}]}"#,
        )
        .unwrap();

        assert!(load_sequence(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
