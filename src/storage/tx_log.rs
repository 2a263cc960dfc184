use crate::core::Transaction;
use crate::error::Result;
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Append-only audit log of submitted transactions, one JSON object per
/// line. The ledger itself stays in memory; the log is for operators.
pub struct TransactionLog {
    path: PathBuf,
}

impl TransactionLog {
    pub fn new<P: AsRef<Path>>(path: P) -> TransactionLog {
        TransactionLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn append(&self, transaction: &Transaction) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(transaction)?;
        writeln!(file, "{line}")?;
        info!(
            "Transaction logged to {}: {}",
            self.path.display(),
            transaction.get_content_hash()
        );
        Ok(())
    }

    /// Read the whole log back. Missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<Transaction>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let mut transactions = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            transactions.push(serde_json::from_str(&line)?);
        }
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = TransactionLog::new(dir.path().join("tx.log"));

        let first = Transaction::new_unsigned("A", "B", 10.0, 1.0, 1000);
        let second = Transaction::new_unsigned("B", "C", 5.0, 0.5, 2000);
        log.append(&first).unwrap();
        log.append(&second).unwrap();

        let restored = log.read_all().unwrap();
        assert_eq!(restored, vec![first, second]);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = TransactionLog::new(dir.path().join("absent.log"));
        assert!(log.read_all().unwrap().is_empty());
    }
}
