use crate::types::{DisplayOptions, StatusTally};

/// Whether a variant row is worth printing.
///
/// `all_variants` shows everything. Otherwise summary mode hides every variant row,
/// and the default mode shows only variants with at least one failed task. A variant
/// filter, when present, hides non-matching variants unless `all_variants` is set.
pub fn should_show_variant(variant_name: &str, tally: &StatusTally, options: &DisplayOptions) -> bool {
    if options.all_variants {
        return true;
    }
    if let Some(filter) = &options.variant_filter
        && !filter.is_match(variant_name)
    {
        return false;
    }
    if options.summary {
        return false;
    }
    tally.failed > 0
}

pub fn should_show_commit_summary(options: &DisplayOptions) -> bool {
    options.summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use regex::Regex;

    fn with_failures(failed: u32) -> StatusTally {
        StatusTally {
            failed,
            success: 3,
            ..StatusTally::zero()
        }
    }

    #[test]
    fn default_mode_shows_only_failing_variants() {
        let options = DisplayOptions::default();
        assert!(!should_show_variant("linux", &StatusTally::zero(), &options));
        assert!(!should_show_variant("linux", &with_failures(0), &options));
        assert!(should_show_variant("linux", &with_failures(1), &options));
    }

    #[test]
    fn summary_mode_hides_variants_even_with_failures() {
        let options = DisplayOptions {
            summary: true,
            ..Default::default()
        };
        assert!(!should_show_variant("linux", &with_failures(5), &options));
        assert!(should_show_commit_summary(&options));
    }

    #[test]
    fn all_variants_wins_over_summary_and_filter() {
        let options = DisplayOptions {
            all_variants: true,
            summary: true,
            variant_filter: Some(Regex::new("^windows").unwrap()),
            ..Default::default()
        };
        assert!(should_show_variant("linux", &StatusTally::zero(), &options));
        // The two decisions are independent
        assert!(should_show_commit_summary(&options));
    }

    #[test]
    fn variant_filter_hides_non_matching_failures() {
        let options = DisplayOptions {
            variant_filter: Some(Regex::new("enterprise").unwrap()),
            ..Default::default()
        };
        assert!(!should_show_variant("linux-64", &with_failures(2), &options));
        assert!(should_show_variant("enterprise-rhel-62", &with_failures(2), &options));
        assert!(!should_show_variant("enterprise-rhel-62", &with_failures(0), &options));
    }

    #[test]
    fn summary_row_depends_only_on_summary_flag() {
        assert!(!should_show_commit_summary(&DisplayOptions::default()));
        let options = DisplayOptions {
            all_variants: true,
            ..Default::default()
        };
        assert!(!should_show_commit_summary(&options));
    }

    proptest! {
        #[test]
        fn all_variants_always_shows(
            success in 0..50u32,
            failed in 0..50u32,
            dispatched in 0..50u32,
            summary in any::<bool>(),
            details in any::<bool>(),
        ) {
            let tally = StatusTally { success, failed, dispatched, ..StatusTally::zero() };
            let options = DisplayOptions {
                all_variants: true,
                summary,
                details,
                ..Default::default()
            };
            prop_assert!(should_show_variant("any", &tally, &options));
        }
    }
}
