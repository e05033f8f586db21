//! Contact kinds, phone helpers, and skip-trace CSV intake.

use std::io::{self, Read};

use serde::{Deserialize, Serialize};

/// Contact channel. Declaration order is the display order for an owner's
/// contacts: e-mail first, then phone kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContactType {
    Email,
    Cell,
    Home,
    Work,
    Landline,
    Fax,
    Business,
    Personal,
}

impl ContactType {
    pub fn is_phone(&self) -> bool {
        !matches!(self, ContactType::Email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneLabel {
    Primary,
    Secondary,
    Mobile,
    Work,
    Home,
    Other,
}

/// Payload for creating a contact under an owner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    #[serde(default)]
    pub label: Option<PhoneLabel>,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_priority() -> u8 {
    1
}

impl NewContact {
    fn email(address: &str, priority: u8) -> Self {
        Self {
            phone: None,
            email: Some(address.to_string()),
            contact_type: ContactType::Email,
            label: None,
            priority,
            notes: None,
        }
    }

    fn phone(number: &str, contact_type: ContactType, priority: u8) -> Self {
        Self {
            phone: Some(number.to_string()),
            email: None,
            contact_type,
            label: None,
            priority,
            notes: None,
        }
    }

    /// A contact must carry at least one non-blank channel.
    pub fn has_channel(&self) -> bool {
        let filled = |value: &Option<String>| {
            value
                .as_deref()
                .map(|raw| !raw.trim().is_empty())
                .unwrap_or(false)
        };
        filled(&self.phone) || filled(&self.email)
    }
}

/// Render a phone number for display, e.g. `(515)-555-0134`.
///
/// Ten digit numbers and eleven digit numbers with a leading `1` are
/// reformatted; anything else is returned untouched.
pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let local = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('1') => &digits[1..],
        _ => return phone.to_string(),
    };
    format!("({})-{}-{}", &local[..3], &local[3..6], &local[6..])
}

/// Normalize a dialable number to E.164, assuming NANP for bare numbers.
pub fn to_e164(phone: &str) -> Option<String> {
    let trimmed = phone.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

    if trimmed.starts_with('+') {
        return (8..=15).contains(&digits.len()).then(|| format!("+{digits}"));
    }

    match digits.len() {
        10 => Some(format!("+1{digits}")),
        11 if digits.starts_with('1') => Some(format!("+{digits}")),
        _ => None,
    }
}

/// One row of a skip-trace export. Unknown columns are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SkipTraceRow {
    #[serde(rename = "Email 1", default)]
    email_1: Option<String>,
    #[serde(rename = "Email 2", default)]
    email_2: Option<String>,
    #[serde(rename = "Wireless 1", default)]
    wireless_1: Option<String>,
    #[serde(rename = "Wireless 2", default)]
    wireless_2: Option<String>,
    #[serde(rename = "Wireless 3", default)]
    wireless_3: Option<String>,
    #[serde(rename = "Wireless 4", default)]
    wireless_4: Option<String>,
    #[serde(rename = "Landline 1", default)]
    landline_1: Option<String>,
    #[serde(rename = "Landline 2", default)]
    landline_2: Option<String>,
    #[serde(rename = "Landline 3", default)]
    landline_3: Option<String>,
    #[serde(rename = "Landline 4", default)]
    landline_4: Option<String>,
}

impl SkipTraceRow {
    /// Expand the row into contacts; the column number becomes the priority.
    pub fn into_contacts(self) -> Vec<NewContact> {
        let emails = [self.email_1, self.email_2];
        let wireless = [
            self.wireless_1,
            self.wireless_2,
            self.wireless_3,
            self.wireless_4,
        ];
        let landlines = [
            self.landline_1,
            self.landline_2,
            self.landline_3,
            self.landline_4,
        ];

        let mut contacts = Vec::new();
        for (priority, value) in numbered(emails) {
            contacts.push(NewContact::email(&value, priority));
        }
        for (priority, value) in numbered(wireless) {
            contacts.push(NewContact::phone(&value, ContactType::Cell, priority));
        }
        for (priority, value) in numbered(landlines) {
            contacts.push(NewContact::phone(&value, ContactType::Landline, priority));
        }
        contacts
    }
}

fn numbered<const N: usize>(cells: [Option<String>; N]) -> impl Iterator<Item = (u8, String)> {
    cells
        .into_iter()
        .zip(1u8..)
        .filter_map(|(cell, priority)| {
            cell.map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(|value| (priority, value))
        })
}

/// Parse a skip-trace CSV export into contact payloads for a single owner.
///
/// Rows must have as many fields as the header, and quoted fields must be
/// closed; anything else is a `csv::Error`.
pub fn contacts_from_skip_trace<R: Read>(mut reader: R) -> Result<Vec<NewContact>, csv::Error> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    // Well-formed CSV always carries an even number of quote characters.
    if raw.iter().filter(|byte| **byte == b'"').count() % 2 == 1 {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "unterminated quoted field").into());
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_slice());
    reader.headers()?;

    let mut contacts = Vec::new();
    for row in reader.deserialize::<SkipTraceRow>() {
        contacts.extend(row?.into_contacts());
    }
    Ok(contacts)
}
