use crate::error::{Result, SyncError};
use crate::vcf::parse_vcf;
use ringer_core::{Contact, ContactsSource};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Address book backed by a `.vcf` file, re-read on every snapshot.
#[derive(Debug, Clone)]
pub struct VcfFileContacts {
    path: PathBuf,
}

impl VcfFileContacts {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContactsSource for VcfFileContacts {
    type Error = SyncError;

    fn source_name(&self) -> &'static str {
        "vcf"
    }

    fn contacts(&self) -> Result<Vec<Contact>> {
        let data = fs::read_to_string(&self.path).map_err(|source| SyncError::Read {
            path: self.path.clone(),
            source,
        })?;
        let parsed = parse_vcf(&data)?;
        for warning in &parsed.warnings {
            warn!(path = %self.path.display(), %warning, "vcard warning");
        }
        debug!(
            path = %self.path.display(),
            contacts = parsed.contacts.len(),
            skipped = parsed.skipped,
            "vcard contacts loaded"
        );
        Ok(parsed.contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::VcfFileContacts;
    use crate::error::SyncError;
    use ringer_core::ContactsSource;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_contacts_from_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("contacts.vcf");
        fs::write(
            &path,
            "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Ada\r\nTEL;TYPE=cell:555 0101\r\nEND:VCARD\r\n",
        )
        .expect("write vcf");

        let contacts = VcfFileContacts::new(&path).contacts().expect("contacts");
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].phones[0].number, "555 0101");
        assert_eq!(contacts[0].phones[0].label, "cell");
    }

    #[test]
    fn missing_file_is_read_error() {
        let temp = TempDir::new().expect("temp dir");
        let err = VcfFileContacts::new(temp.path().join("missing.vcf"))
            .contacts()
            .unwrap_err();
        assert!(matches!(err, SyncError::Read { .. }));
    }
}
