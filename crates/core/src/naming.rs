//! Archive naming convention.
//!
//! Every completed job produces exactly one archive in the durable output
//! directory, named deterministically from the job id and target engine so
//! concurrent jobs can never collide.

use crate::types::DbId;

/// Prefix of every archive file name.
pub const ARCHIVE_PREFIX: &str = "scenaris_export";

/// Archive container extension.
pub const ARCHIVE_EXT: &str = "zip";

/// Build the archive file name for a job.
///
/// Convention: `scenaris_export_{job_id}_{engine}.zip`
///
/// # Examples
///
/// ```
/// use scenaris_core::naming::archive_file_name;
///
/// assert_eq!(archive_file_name(7, "blender"), "scenaris_export_7_blender.zip");
/// assert_eq!(archive_file_name(12, "ue5"), "scenaris_export_12_ue5.zip");
/// ```
pub fn archive_file_name(job_id: DbId, engine: &str) -> String {
    format!("{ARCHIVE_PREFIX}_{job_id}_{engine}.{ARCHIVE_EXT}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_contains_job_id_and_engine() {
        let name = archive_file_name(42, "godot");
        assert_eq!(name, "scenaris_export_42_godot.zip");
    }

    #[test]
    fn distinct_jobs_get_distinct_names() {
        assert_ne!(archive_file_name(1, "unity"), archive_file_name(2, "unity"));
    }

    #[test]
    fn distinct_engines_get_distinct_names() {
        assert_ne!(archive_file_name(1, "unity"), archive_file_name(1, "ue5"));
    }
}
