use crate::types::{WaterfallError, WaterfallResult};

/// Minimum length of the date stamp that closes every build id.
const DATE_SUFFIX_LEN: usize = 17;

/// Extract the creation time encoded at the end of a build id, as `YYYY-MM-DD HH:MM:SS`.
///
/// The last six underscore-separated fields hold the date. Evergreen writes them as
/// `YY_MM_DD_HH_MM_SS`; ids carrying a four-digit year in third position
/// (`MM_DD_YYYY_HH_MM_SS`) are accepted as well. The value is not interpreted in any
/// timezone.
pub fn parse_build_date(build_id: &str) -> WaterfallResult<String> {
    let malformed = || WaterfallError::MalformedBuildId {
        build_id: build_id.to_string(),
        revision: None,
    };

    if build_id.len() < DATE_SUFFIX_LEN {
        return Err(malformed());
    }

    let mut fields: Vec<&str> = build_id.rsplitn(7, '_').take(6).collect();
    fields.reverse();
    if fields.len() != 6
        || fields
            .iter()
            .any(|f| f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(malformed());
    }

    let (year, month, day) = match (fields[0].len(), fields[1].len(), fields[2].len()) {
        (2, 2, 4) => (fields[2].to_string(), fields[0], fields[1]),
        (2, 2, 2) => (format!("20{}", fields[0]), fields[1], fields[2]),
        _ => return Err(malformed()),
    };
    if fields[3..].iter().any(|f| f.len() != 2) {
        return Err(malformed());
    }

    Ok(format!(
        "{}-{}-{} {}:{}:{}",
        year, month, day, fields[3], fields[4], fields[5]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_digit_year_layout() {
        assert_eq!(
            parse_build_date("mongodb_mongo_master_ubuntu1404_03_15_2016_14_05_09").unwrap(),
            "2016-03-15 14:05:09"
        );
    }

    #[test]
    fn evergreen_layout() {
        assert_eq!(
            parse_build_date(
                "mongodb_mongo_master_enterprise_rhel_62_64_bit_4a5a1e0e5c9b_16_03_15_14_05_09"
            )
            .unwrap(),
            "2016-03-15 14:05:09"
        );
    }

    #[test]
    fn bare_date_stamp() {
        assert_eq!(
            parse_build_date("16_03_15_14_05_09").unwrap(),
            "2016-03-15 14:05:09"
        );
    }

    #[test]
    fn rejects_short_ids() {
        assert!(matches!(
            parse_build_date("16_03_15_14_05"),
            Err(WaterfallError::MalformedBuildId { .. })
        ));
        assert!(parse_build_date("").is_err());
    }

    #[test]
    fn rejects_wrong_field_count_or_content() {
        // Long enough, but not six fields
        assert!(parse_build_date("abcdefghijklmnopqrstuvwxyz").is_err());
        assert!(parse_build_date("project_variant_16_03_15_14_05_xx").is_err());
        assert!(parse_build_date("project_variant_16_03_15_14__09").is_err());
        assert!(parse_build_date("project_variant_160_03_15_14_05_09").is_err());
    }

    #[test]
    fn error_names_the_build_id() {
        let err = parse_build_date("bogus").unwrap_err();
        assert_eq!(err.to_string(), "Cannot read a date from build id 'bogus'");
        let err = err.in_commit("deadbeef");
        assert_eq!(
            err.to_string(),
            "Cannot read a date from build id 'bogus' in commit deadbeef"
        );
    }
}
