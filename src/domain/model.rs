use crate::utils::error::{HerdError, Result};
use crate::utils::validation::{validate_identifier, validate_name, validate_parent_reference};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by the storage layer. `0` means "not assigned yet"
/// on a record and "no parent recorded" on a parent reference.
///
/// Always within `0..=i64::MAX`, so it converts losslessly to the signed
/// row form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct AnimalId(u64);

impl AnimalId {
    pub const UNASSIGNED: AnimalId = AnimalId(0);
    pub const MAX: AnimalId = AnimalId(i64::MAX as u64);

    /// # Panics
    ///
    /// Panics when `raw` is above `i64::MAX`; use [`AnimalId::try_new`] for
    /// untrusted input.
    pub const fn new(raw: u64) -> Self {
        assert!(raw <= i64::MAX as u64, "animal id above i64::MAX");
        Self(raw)
    }

    pub fn try_new(raw: u64) -> Result<Self> {
        if raw > Self::MAX.0 {
            return Err(HerdError::IdentifierOutOfRange {
                field: "id".to_string(),
                value: raw,
            });
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn as_i64(self) -> i64 {
        // 不變式保證不超過 i64::MAX
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }

    /// The id after this one, or `None` once the id space is used up.
    pub fn next(self) -> Option<AnimalId> {
        self.0
            .checked_add(1)
            .filter(|raw| *raw <= Self::MAX.0)
            .map(AnimalId)
    }

    pub fn is_unassigned(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for AnimalId {
    type Error = HerdError;

    fn try_from(raw: u64) -> Result<Self> {
        Self::try_new(raw)
    }
}

impl TryFrom<i64> for AnimalId {
    type Error = HerdError;

    fn try_from(raw: i64) -> Result<Self> {
        validate_identifier("id", raw)
    }
}

impl From<AnimalId> for i64 {
    fn from(id: AnimalId) -> Self {
        id.as_i64()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn symbol(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Sex {
    type Err = HerdError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "M" => Ok(Sex::Male),
            "F" => Ok(Sex::Female),
            other => Err(HerdError::InvalidSex {
                value: other.to_string(),
            }),
        }
    }
}

/// 未經驗證的原始資料，對應檔案列或外部傳輸格式
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimalRow {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub sex: String,
    #[serde(default)]
    pub father_id: Option<i64>,
    #[serde(default)]
    pub mother_id: Option<i64>,
}

/// A validated animal. Name and sex are checked on every construction and
/// every update, so an instance with an invalid name or sex cannot exist.
/// Parent references are only checked for non-negativity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AnimalRow", into = "AnimalRow")]
pub struct AnimalRecord {
    id: AnimalId,
    name: String,
    sex: Sex,
    father_id: Option<AnimalId>,
    mother_id: Option<AnimalId>,
}

struct Profile {
    name: String,
    sex: Sex,
}

fn validate_profile(name: &str, sex: &str) -> Result<Profile> {
    validate_name(name)?;
    let sex = sex.parse::<Sex>()?;
    Ok(Profile {
        name: name.to_string(),
        sex,
    })
}

impl AnimalRecord {
    /// Builds a record that has not been stored yet; its id is unassigned.
    pub fn new(
        name: &str,
        sex: &str,
        father_id: Option<i64>,
        mother_id: Option<i64>,
    ) -> Result<Self> {
        Self::with_id(0, name, sex, father_id, mother_id)
    }

    pub fn with_id(
        id: i64,
        name: &str,
        sex: &str,
        father_id: Option<i64>,
        mother_id: Option<i64>,
    ) -> Result<Self> {
        let profile = validate_profile(name, sex)?;
        let id = validate_identifier("id", id)?;
        let father_id = validate_parent_reference("father_id", father_id)?;
        let mother_id = validate_parent_reference("mother_id", mother_id)?;

        Ok(Self {
            id,
            name: profile.name,
            sex: profile.sex,
            father_id,
            mother_id,
        })
    }

    /// Used by stores when persisting a new record.
    pub fn assign_id(mut self, id: AnimalId) -> Self {
        self.id = id;
        self
    }

    /// 更新名稱與性別，父母紀錄不變
    pub fn update_profile(&mut self, name: &str, sex: &str) -> Result<()> {
        let profile = validate_profile(name, sex)?;
        self.name = profile.name;
        self.sex = profile.sex;
        Ok(())
    }

    /// 全部欄位先驗證，再一次寫入
    pub fn update(
        &mut self,
        name: &str,
        sex: &str,
        father_id: Option<i64>,
        mother_id: Option<i64>,
    ) -> Result<()> {
        let profile = validate_profile(name, sex)?;
        let father_id = validate_parent_reference("father_id", father_id)?;
        let mother_id = validate_parent_reference("mother_id", mother_id)?;

        self.name = profile.name;
        self.sex = profile.sex;
        self.father_id = father_id;
        self.mother_id = mother_id;
        Ok(())
    }

    pub fn id(&self) -> AnimalId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn father_id(&self) -> Option<AnimalId> {
        self.father_id
    }

    pub fn mother_id(&self) -> Option<AnimalId> {
        self.mother_id
    }

    /// Recorded parents, father first.
    pub fn parents(&self) -> impl Iterator<Item = AnimalId> {
        self.father_id.into_iter().chain(self.mother_id)
    }
}

impl TryFrom<AnimalRow> for AnimalRecord {
    type Error = HerdError;

    fn try_from(row: AnimalRow) -> Result<Self> {
        Self::with_id(row.id, &row.name, &row.sex, row.father_id, row.mother_id)
    }
}

impl From<AnimalRecord> for AnimalRow {
    fn from(record: AnimalRecord) -> Self {
        Self {
            id: record.id.as_i64(),
            name: record.name,
            sex: record.sex.symbol().to_string(),
            father_id: record.father_id.map(AnimalId::as_i64),
            mother_id: record.mother_id.map(AnimalId::as_i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record_keeps_inputs() {
        let record = AnimalRecord::with_id(4, "Estrela", "F", Some(1), Some(2)).unwrap();

        assert_eq!(record.id(), AnimalId::new(4));
        assert_eq!(record.name(), "Estrela");
        assert_eq!(record.sex(), Sex::Female);
        assert_eq!(record.father_id(), Some(AnimalId::new(1)));
        assert_eq!(record.mother_id(), Some(AnimalId::new(2)));
    }

    #[test]
    fn test_new_record_is_unassigned() {
        let record = AnimalRecord::new("Trovão", "M", None, None).unwrap();
        assert!(record.id().is_unassigned());
        assert_eq!(record.parents().count(), 0);
    }

    #[test]
    fn test_zero_parent_means_no_parent() {
        let record = AnimalRecord::with_id(1, "Boris", "M", Some(0), Some(0)).unwrap();
        assert_eq!(record.father_id(), None);
        assert_eq!(record.mother_id(), None);
    }

    #[test]
    fn test_invalid_name_rejected() {
        assert!(matches!(
            AnimalRecord::new("", "M", None, None),
            Err(HerdError::InvalidName { .. })
        ));
        assert!(matches!(
            AnimalRecord::new("Al", "M", None, None),
            Err(HerdError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_invalid_sex_rejected() {
        for sex in ["", "m", "X", "MF", "Male"] {
            assert!(
                matches!(
                    AnimalRecord::new("Mimosa", sex, None, None),
                    Err(HerdError::InvalidSex { .. })
                ),
                "sex {:?} should be rejected",
                sex
            );
        }
    }

    #[test]
    fn test_negative_identifiers_rejected() {
        assert!(matches!(
            AnimalRecord::with_id(-1, "Mimosa", "F", None, None),
            Err(HerdError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            AnimalRecord::with_id(1, "Mimosa", "F", Some(-2), None),
            Err(HerdError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            AnimalRecord::with_id(1, "Mimosa", "F", None, Some(-3)),
            Err(HerdError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_self_parentage_is_allowed() {
        let record = AnimalRecord::with_id(5, "Loopy", "M", Some(5), None).unwrap();
        assert_eq!(record.father_id(), Some(record.id()));
    }

    #[test]
    fn test_failed_update_leaves_record_untouched() {
        let mut record = AnimalRecord::with_id(1, "Mimosa", "F", Some(2), Some(3)).unwrap();
        let before = record.clone();

        assert!(record.update("Mimosa II", "F", Some(-1), None).is_err());
        assert!(record.update("Mi", "F", None, None).is_err());
        assert!(record.update_profile("Mimosa", "Z").is_err());
        assert_eq!(record, before);

        record.update("Mimosa II", "F", None, Some(9)).unwrap();
        assert_eq!(record.name(), "Mimosa II");
        assert_eq!(record.father_id(), None);
        assert_eq!(record.mother_id(), Some(AnimalId::new(9)));
    }

    #[test]
    fn test_update_profile_keeps_parents() {
        let mut record = AnimalRecord::with_id(1, "Mimosa", "F", Some(2), Some(3)).unwrap();
        record.update_profile("Margarida", "F").unwrap();

        assert_eq!(record.name(), "Margarida");
        assert_eq!(record.father_id(), Some(AnimalId::new(2)));
        assert_eq!(record.mother_id(), Some(AnimalId::new(3)));
    }

    #[test]
    fn test_deserialize_goes_through_validation() {
        let ok: AnimalRecord =
            serde_json::from_str(r#"{"id":3,"name":"Bravo","sex":"M","father_id":1}"#).unwrap();
        assert_eq!(ok.father_id(), Some(AnimalId::new(1)));
        assert_eq!(ok.mother_id(), None);

        let bad = serde_json::from_str::<AnimalRecord>(r#"{"id":3,"name":"Bravo","sex":"Q"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_id_range_matches_row_form() {
        assert_eq!(AnimalId::MAX.as_i64(), i64::MAX);
        assert_eq!(AnimalId::MAX.next(), None);
        assert_eq!(AnimalId::new(4).next(), Some(AnimalId::new(5)));

        assert!(matches!(
            AnimalId::try_new(u64::MAX),
            Err(HerdError::IdentifierOutOfRange { value: u64::MAX, .. })
        ));
        assert!(AnimalId::try_new(i64::MAX as u64 + 1).is_err());
        assert!(AnimalId::try_from(-1i64).is_err());
    }

    #[test]
    #[should_panic]
    fn test_new_rejects_ids_above_row_range() {
        let _ = AnimalId::new(u64::MAX);
    }

    #[test]
    fn test_largest_id_survives_row_conversion() {
        let record = AnimalRecord::with_id(i64::MAX, "Último", "M", Some(i64::MAX), None).unwrap();
        let row = AnimalRow::from(record.clone());

        assert_eq!(row.id, i64::MAX);
        assert_eq!(row.father_id, Some(i64::MAX));
        assert_eq!(AnimalRecord::try_from(row).unwrap(), record);
    }

    #[test]
    fn test_serialize_as_row() {
        let record = AnimalRecord::with_id(3, "Bravo", "M", Some(1), None).unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["sex"], "M");
        assert_eq!(json["father_id"], 1);
        assert!(json["mother_id"].is_null());
    }
}
