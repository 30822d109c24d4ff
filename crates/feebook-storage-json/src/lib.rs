use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use feebook_core::{storage::LedgerStorage, CoreError};
use feebook_domain::{Collection, Ledger};

const FILE_EXTENSION: &str = "json";
const META_FILE: &str = "meta";
const TMP_SUFFIX: &str = "tmp";
const BACKUP_SUFFIX: &str = "bak";
/// Present only while documents are being swapped in; its presence on load marks an interrupted commit.
pub const JOURNAL_FILE: &str = "commit-journal.json";

/// Documents taking part in an in-flight commit.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CommitJournal {
    documents: Vec<JournalEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JournalEntry {
    file: String,
    /// Whether a previous version was copied to the backup path.
    backed_up: bool,
}

/// Filesystem-backed JSON persistence: one document per collection plus `meta.json`.
#[derive(Debug, Clone)]
pub struct JsonLedgerStorage {
    root: PathBuf,
}

impl JsonLedgerStorage {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.document_path(collection.key())
    }

    pub fn meta_path(&self) -> PathBuf {
        self.document_path(META_FILE)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.root.join(JOURNAL_FILE)
    }

    fn document_path(&self, stem: &str) -> PathBuf {
        self.root.join(format!("{stem}.{FILE_EXTENSION}"))
    }

    /// Rolls back a commit that stopped part-way through swapping documents in.
    fn recover_interrupted_commit(&self) -> Result<(), CoreError> {
        let journal_path = self.journal_path();
        let journal: CommitJournal = match fs::read_to_string(&journal_path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_default(),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        warn!(
            root = %self.root.display(),
            documents = journal.documents.len(),
            "rolling back interrupted json commit"
        );
        for entry in &journal.documents {
            let path = self.root.join(&entry.file);
            let backup = backup_path(&path);
            if entry.backed_up {
                if backup.is_file() {
                    fs::rename(&backup, &path)?;
                }
            } else if path.is_file() {
                fs::remove_file(&path)?;
            }
            let _ = fs::remove_file(tmp_path(&path));
        }
        fs::remove_file(&journal_path)?;
        Ok(())
    }

    fn staged_documents(
        &self,
        ledger: &Ledger,
        changed: &[Collection],
    ) -> Result<Vec<(PathBuf, String)>, CoreError> {
        let mut documents = Vec::with_capacity(changed.len() + 1);
        for collection in Collection::ALL {
            if !changed.contains(&collection) {
                continue;
            }
            let body = match collection {
                Collection::Students => serialize(&ledger.students)?,
                Collection::Payments => serialize(&ledger.payments)?,
                Collection::SkippedMonths => serialize(&ledger.skipped_months)?,
            };
            documents.push((self.collection_path(collection), body));
        }
        documents.push((self.meta_path(), serialize(&ledger.meta)?));
        Ok(documents)
    }
}

impl LedgerStorage for JsonLedgerStorage {
    fn load(&self) -> Result<Ledger, CoreError> {
        self.recover_interrupted_commit()?;
        let ledger = Ledger {
            students: read_or_default(&self.collection_path(Collection::Students))?,
            payments: read_or_default(&self.collection_path(Collection::Payments))?,
            skipped_months: read_or_default(&self.collection_path(Collection::SkippedMonths))?,
            meta: read_or_default(&self.meta_path())?,
        };
        debug!(root = %self.root.display(), "json ledger read");
        Ok(ledger)
    }

    /// Writes every document to a temp file, backs up the current versions, journals the
    /// swap and only then renames. A failed rename restores the documents already replaced.
    fn commit(&self, ledger: &Ledger, changed: &[Collection]) -> Result<(), CoreError> {
        let documents = self.staged_documents(ledger, changed)?;

        let mut written = Vec::with_capacity(documents.len());
        for (path, body) in &documents {
            let tmp = tmp_path(path);
            if let Err(err) = write_atomic(&tmp, body) {
                let _ = fs::remove_file(&tmp);
                discard(&written);
                return Err(err);
            }
            written.push(tmp);
        }

        let mut journal = CommitJournal::default();
        let mut backups = Vec::new();
        for (path, _) in &documents {
            let backed_up = path.is_file();
            if backed_up {
                let backup = backup_path(path);
                if let Err(err) = fs::copy(path, &backup) {
                    discard(&written);
                    discard(&backups);
                    return Err(err.into());
                }
                backups.push(backup);
            }
            journal.documents.push(JournalEntry {
                file: file_name(path),
                backed_up,
            });
        }
        let journal_path = self.journal_path();
        if let Err(err) = serialize(&journal).and_then(|body| write_atomic(&journal_path, &body)) {
            let _ = fs::remove_file(&journal_path);
            discard(&written);
            discard(&backups);
            return Err(err);
        }

        for (index, ((path, _), tmp)) in documents.iter().zip(&written).enumerate() {
            if let Err(err) = fs::rename(tmp, path) {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "rename failed; restoring json documents"
                );
                for (entry, (replaced, _)) in journal.documents.iter().zip(&documents).take(index) {
                    restore(replaced, entry.backed_up)?;
                }
                discard(&written[index..]);
                discard(&backups);
                fs::remove_file(&journal_path)?;
                return Err(err.into());
            }
        }

        fs::remove_file(&journal_path)?;
        discard(&backups);
        debug!(
            root = %self.root.display(),
            documents = documents.len(),
            "json ledger committed"
        );
        Ok(())
    }
}

/// Puts back the previous version of a document replaced earlier in a failed commit.
fn restore(path: &Path, backed_up: bool) -> Result<(), CoreError> {
    if backed_up {
        fs::rename(backup_path(path), path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

fn read_or_default<T>(path: &Path) -> Result<T, CoreError>
where
    T: DeserializeOwned + Default,
{
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => return Err(err.into()),
    };
    if data.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&data)
        .map_err(|err| CoreError::Serde(format!("{}: {err}", path.display())))
}

fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value).map_err(|err| CoreError::Serde(err.to_string()))
}

fn discard(paths: &[PathBuf]) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    with_suffix(path, TMP_SUFFIX)
}

fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, BACKUP_SUFFIX)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{suffix}"),
        None => suffix.to_string(),
    };
    sibling.set_extension(ext);
    sibling
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
