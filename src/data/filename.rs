//! Language code and dump date carried by a dump file name

use std::path::Path;

use regex::Regex;

use crate::error::DumpNameError;

/// `<lang>wiki-<YYYYMMDD>...` parsed from a dump file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpName {
    pub lang: String,
    pub date: String,
}

impl DumpName {
    /// Parse the file name component of `path` (directories are ignored)
    pub fn from_path(path: &Path) -> Result<Self, DumpNameError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::parse(&file_name)
    }

    pub fn parse(file_name: &str) -> Result<Self, DumpNameError> {
        let lang = file_name
            .find("wiki")
            .map(|pos| file_name[..pos].to_string())
            .ok_or_else(|| DumpNameError::MissingLanguage(file_name.to_string()))?;

        let date_re = Regex::new(r"wiki-(\d{4})(\d{2})(\d{2})")
            .map_err(|_| DumpNameError::MissingDate(file_name.to_string()))?;
        let caps = date_re
            .captures(file_name)
            .ok_or_else(|| DumpNameError::MissingDate(file_name.to_string()))?;
        let date = (1..=3).map(|i| &caps[i]).collect::<String>();

        Ok(Self { lang, date })
    }

    /// `<lang>wiki-<date>-<suffix>`
    pub fn output_name(&self, suffix: &str) -> String {
        format!("{}wiki-{}-{}", self.lang, self.date, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_and_date() {
        let name = DumpName::from_path(Path::new("/data/dumps/enwiki-20100130-pages-meta.bin")).unwrap();
        assert_eq!(name.lang, "en");
        assert_eq!(name.date, "20100130");
        assert_eq!(name.output_name("hist.dat"), "enwiki-20100130-hist.dat");
    }

    #[test]
    fn directory_names_are_ignored() {
        let name = DumpName::from_path(Path::new("/wiki-19990101/vecwiki-20091230.json")).unwrap();
        assert_eq!(name.lang, "vec");
        assert_eq!(name.date, "20091230");
    }

    #[test]
    fn rejects_names_without_markers() {
        assert_eq!(
            DumpName::parse("graph.bin"),
            Err(DumpNameError::MissingLanguage("graph.bin".to_string()))
        );
        assert_eq!(
            DumpName::parse("enwiki-latest.bin"),
            Err(DumpNameError::MissingDate("enwiki-latest.bin".to_string()))
        );
    }
}
