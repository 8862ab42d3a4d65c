use crate::error::{Result, SyncError};
use ringer_core::{Contact, Email, Phone};

#[derive(Debug, Clone)]
pub struct ParsedVcf {
    pub contacts: Vec<Contact>,
    pub warnings: Vec<String>,
    pub skipped: usize,
}

/// TYPE values that say nothing about which address of a contact this is.
const GENERIC_TYPES: [&str; 5] = ["pref", "voice", "internet", "x400", "text"];

pub fn parse_vcf(data: &str) -> Result<ParsedVcf> {
    let mut warnings = Vec::new();
    let mut contacts = Vec::new();
    let mut skipped = 0;
    let mut saw_card = false;

    let mut current: Option<RawCard> = None;
    for line in unfold_lines(data) {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("BEGIN:VCARD") {
            if current.is_some() {
                warnings.push("nested BEGIN:VCARD encountered".to_string());
            }
            saw_card = true;
            current = Some(RawCard::default());
            continue;
        }

        if trimmed.eq_ignore_ascii_case("END:VCARD") {
            if let Some(card) = current.take() {
                if let Some(contact) = card.into_contact(&mut warnings, &mut skipped) {
                    contacts.push(contact);
                }
            } else {
                warnings.push("END:VCARD without matching BEGIN:VCARD".to_string());
            }
            continue;
        }

        let Some(card) = current.as_mut() else {
            continue;
        };

        let Some(property) = split_property(trimmed) else {
            continue;
        };

        match property.name.as_str() {
            "FN" => {
                let value = unescape_vcard_value(&property.value);
                if card.fn_name.is_none() && !value.trim().is_empty() {
                    card.fn_name = Some(value.trim().to_string());
                }
            }
            "N" => {
                if card.n_name.is_none() {
                    card.n_name = structured_name(&property.value);
                }
            }
            "TEL" => {
                let value = unescape_vcard_value(&property.value);
                if !value.trim().is_empty() {
                    card.phones.push(Phone::new(value.trim(), property.label()));
                }
            }
            "EMAIL" => {
                let value = unescape_vcard_value(&property.value);
                if !value.trim().is_empty() {
                    card.emails.push(Email::new(value.trim(), property.label()));
                }
            }
            _ => {}
        }
    }

    if current.is_some() {
        warnings.push("missing END:VCARD at end of file".to_string());
        if let Some(card) = current.take() {
            if let Some(contact) = card.into_contact(&mut warnings, &mut skipped) {
                contacts.push(contact);
            }
        }
    }

    if !saw_card && !data.trim().is_empty() {
        return Err(SyncError::Parse("no BEGIN:VCARD found".to_string()));
    }

    Ok(ParsedVcf {
        contacts,
        warnings,
        skipped,
    })
}

#[derive(Default)]
struct RawCard {
    fn_name: Option<String>,
    n_name: Option<String>,
    phones: Vec<Phone>,
    emails: Vec<Email>,
}

impl RawCard {
    fn into_contact(self, warnings: &mut Vec<String>, skipped: &mut usize) -> Option<Contact> {
        let Some(name) = self.fn_name.or(self.n_name) else {
            warnings.push("missing FN and N; skipping vCard".to_string());
            *skipped += 1;
            return None;
        };
        Some(Contact::new(name, self.phones, self.emails))
    }
}

struct Property {
    name: String,
    types: Vec<String>,
    value: String,
}

impl Property {
    fn label(&self) -> String {
        self.types
            .iter()
            .find(|kind| !GENERIC_TYPES.contains(&kind.as_str()))
            .cloned()
            .unwrap_or_default()
    }
}

fn split_property(line: &str) -> Option<Property> {
    let (left, value) = line.split_once(':')?;
    let mut parts = left.split(';');
    let mut name = parts.next()?.trim();
    if let Some((_, group)) = name.rsplit_once('.') {
        name = group;
    }
    if name.is_empty() {
        return None;
    }

    let mut types = Vec::new();
    for param in parts {
        let param = param.trim();
        let raw = match param.split_once('=') {
            Some((key, raw)) if key.trim().eq_ignore_ascii_case("TYPE") => raw,
            Some(_) => continue,
            // vCard 2.1 bare parameter, e.g. TEL;WORK;VOICE
            None => param,
        };
        for kind in raw.trim_matches('"').split(',') {
            let kind = kind.trim();
            if !kind.is_empty() {
                types.push(kind.to_ascii_lowercase());
            }
        }
    }

    Some(Property {
        name: name.to_ascii_uppercase(),
        types,
        value: value.to_string(),
    })
}

/// `N:Family;Given;Additional;Prefix;Suffix` rendered as "Given Family".
fn structured_name(raw: &str) -> Option<String> {
    let parts: Vec<String> = split_unescaped(raw, ';')
        .iter()
        .map(|part| unescape_vcard_value(part).trim().to_string())
        .collect();
    let family = parts.first().map(String::as_str).unwrap_or_default();
    let given = parts.get(1).map(String::as_str).unwrap_or_default();
    let joined = [given, family]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn unfold_lines(input: &str) -> Vec<String> {
    let input = normalize_line_endings(input);
    let mut lines: Vec<String> = Vec::new();
    for line in input.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(&line[1..]);
            } else {
                lines.push(line[1..].to_string());
            }
        } else {
            lines.push(line.to_string());
        }
    }
    lines
}

fn normalize_line_endings(input: &str) -> std::borrow::Cow<'_, str> {
    if !input.contains('\r') {
        return std::borrow::Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if matches!(chars.peek(), Some('\n')) {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    std::borrow::Cow::Owned(out)
}

fn split_unescaped(value: &str, separator: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut escape = false;

    for ch in value.chars() {
        if escape {
            current.push(ch);
            escape = false;
            continue;
        }

        if ch == '\\' {
            current.push(ch);
            escape = true;
            continue;
        }

        if ch == separator {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }

    items.push(current);
    items
}

fn unescape_vcard_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') | Some('N') => out.push('\n'),
                Some('r') | Some('R') => out.push('\n'),
                Some(other) => out.push(other),
                None => break,
            }
        } else {
            out.push(ch);
        }
    }
    out
}
