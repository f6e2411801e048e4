use crate::adapters::memory::InMemoryHerd;
use crate::domain::model::{AnimalRecord, AnimalRow};
use crate::utils::error::{HerdError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HerdFormat {
    Csv,
    Json,
}

impl HerdFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("csv") => Ok(HerdFormat::Csv),
            Some("json") => Ok(HerdFormat::Json),
            _ => Err(HerdError::InvalidConfigValueError {
                field: "storage.herd_file".to_string(),
                value: path.display().to_string(),
                reason: "Herd file must end in .csv or .json".to_string(),
            }),
        }
    }
}

/// A herd persisted as a flat file of animal rows.
///
/// CSV files carry the header `id,name,sex,father_id,mother_id`; empty
/// parent cells mean no parent. JSON files hold an array of the same rows.
#[derive(Debug, Clone)]
pub struct HerdFile {
    path: PathBuf,
    format: HerdFormat,
}

impl HerdFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let format = HerdFormat::from_path(&path)?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> HerdFormat {
        self.format
    }

    /// 讀取並驗證每一列，任何一列不合法就整體失敗
    pub async fn load(&self) -> Result<Vec<AnimalRecord>> {
        let data = tokio::fs::read(&self.path).await?;
        let rows = match self.format {
            HerdFormat::Csv => {
                let mut reader = csv::Reader::from_reader(data.as_slice());
                reader
                    .deserialize::<AnimalRow>()
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
            HerdFormat::Json => serde_json::from_slice::<Vec<AnimalRow>>(&data)?,
        };

        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            match AnimalRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::error!("Invalid animal at row {} of {}: {}", index + 1, self.path.display(), e);
                    return Err(e);
                }
            }
        }

        tracing::info!("📁 Loaded {} animals from {}", records.len(), self.path.display());
        Ok(records)
    }

    pub async fn load_into_memory(&self) -> Result<InMemoryHerd> {
        InMemoryHerd::from_records(self.load().await?)
    }

    pub async fn save(&self, records: &[AnimalRecord]) -> Result<()> {
        let rows: Vec<AnimalRow> = records.iter().cloned().map(AnimalRow::from).collect();

        let data = match self.format {
            HerdFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for row in &rows {
                    writer.serialize(row)?;
                }
                writer.into_inner().map_err(|e| HerdError::StorageError {
                    message: format!("Failed to flush CSV output: {}", e),
                })?
            }
            HerdFormat::Json => serde_json::to_vec_pretty(&rows)?,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.path, data).await?;
        tracing::debug!("Saved {} animals to {}", rows.len(), self.path.display());
        Ok(())
    }
}
