//! Contact validation scoring.
//!
//! Every submitted candidate is compared against the full stored population.
//! Each pairwise comparison produces a score through an ordered rule cascade
//! where a rule only ever lowers the running value, and the population score
//! is the minimum across all pairs: a contact is only as unique as its most
//! suspicious collision. 1.0 means confidently unique; lower values mean
//! rising duplicate suspicion.

use crate::fieldkey::{FieldKey, FieldMatches};

/// Score of a contact with no overlap anywhere in the population.
pub const UNIQUE_SCORE: f64 = 1.0;

/// Validity boundary used by the read paths: contacts scoring above this are
/// listed as "not a duplicate" by default.
pub const VALID_MIN_SCORE: f64 = 0.6;

/// Default ceiling for the suspect listing; anything scoring below it is
/// surfaced for manual review.
pub const SUSPECT_MAX_SCORE: f64 = 0.99;

/// Same source URL and nothing else: likely a different person from the same
/// page.
pub const SAME_SOURCE_ONLY: f64 = 0.7;

/// Same source URL plus name, phone or secondary overlap: highly suspicious.
pub const SOURCE_WITH_OVERLAP: f64 = 0.3;

/// Name plus two or more of organization/position/region.
pub const NAME_WITH_SECONDARY: f64 = 0.4;

/// Phone is the only agreeing field.
pub const PHONE_ONLY: f64 = 0.6;

/// A single repeated attribute, or secondary fields repeating without the
/// name: acceptable overlap.
pub const SINGLE_OVERLAP: f64 = 0.9;

/// Four or more of the six fields agree.
pub const BROAD_OVERLAP: f64 = 0.2;

/// Three fields agree and one of them is the name.
pub const BROAD_OVERLAP_WITH_NAME: f64 = 0.3;

/// Score one candidate/existing pair through the rule cascade.
///
/// Rules are prioritized and only clamp downward; the two URL rules are
/// mutually exclusive, the broad-overlap rules at the end override anything
/// above them through the same min-clamp.
#[must_use]
pub fn compare(candidate: &FieldKey, existing: &FieldKey) -> f64 {
    let m = candidate.matches(existing);
    let secondary = m.secondary();

    let mut score = UNIQUE_SCORE;

    if m.url && !m.name && !m.phone && secondary == 0 {
        // Same origin but no other agreement.
        score = score.min(SAME_SOURCE_ONLY);
    } else if m.url && (m.name || m.phone || secondary > 0) {
        // Same origin plus other overlap.
        score = score.min(SOURCE_WITH_OVERLAP);
    }

    if m.name && secondary >= 2 {
        score = score.min(NAME_WITH_SECONDARY);
    } else if m.phone && !m.name && secondary == 0 && !m.url {
        score = score.min(PHONE_ONLY);
    } else if !m.name && !m.url {
        if secondary >= 1 {
            score = score.min(SINGLE_OVERLAP);
        }
    } else if m.name && secondary == 0 && !m.phone && !m.url {
        score = score.min(SINGLE_OVERLAP);
    }

    score.min(broad_overlap(&m))
}

fn broad_overlap(m: &FieldMatches) -> f64 {
    let total = m.total();
    if total >= 4 {
        BROAD_OVERLAP
    } else if total >= 3 && m.name {
        BROAD_OVERLAP_WITH_NAME
    } else {
        UNIQUE_SCORE
    }
}

/// Score a candidate against the whole population.
///
/// Pure min-fold over [`compare`]; an empty population scores
/// [`UNIQUE_SCORE`]. Order-independent by construction.
#[must_use]
pub fn score<'a, I>(candidate: &FieldKey, population: I) -> f64
where
    I: IntoIterator<Item = &'a FieldKey>,
{
    population
        .into_iter()
        .fold(UNIQUE_SCORE, |min_score, existing| {
            min_score.min(compare(candidate, existing))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContactCandidate;

    fn key(c: &ContactCandidate) -> FieldKey {
        FieldKey::of_candidate(c)
    }

    fn base(name: &str, url: &str) -> ContactCandidate {
        ContactCandidate::new(name, url)
    }

    #[test]
    fn test_empty_population_scores_unique() {
        let candidate = key(&base("Ana Pérez", "https://x.com/1"));
        let population: Vec<FieldKey> = Vec::new();
        assert_eq!(score(&candidate, &population), 1.0);
    }

    #[test]
    fn test_no_overlap_scores_unique() {
        let a = key(&base("Ana Pérez", "https://x.com/1").with_organization("UC"));
        let b = key(&base("Juan Soto", "https://y.com/2").with_organization("UACh"));
        assert_eq!(compare(&a, &b), 1.0);
    }

    #[test]
    fn test_url_only_scores_same_source() {
        let a = key(&base("Ana Pérez", "https://x.com/1"));
        let b = key(&base("Juan Soto", "https://x.com/1"));
        assert_eq!(compare(&a, &b), SAME_SOURCE_ONLY);
    }

    #[test]
    fn test_url_plus_phone_scores_source_overlap() {
        let a = key(&base("Ana Pérez", "https://x.com/1").with_phone("111-222"));
        let b = key(&base("Juan Soto", "https://x.com/1").with_phone("111 222"));
        assert_eq!(compare(&a, &b), SOURCE_WITH_OVERLAP);
    }

    #[test]
    fn test_url_plus_name_scores_source_overlap() {
        let a = key(&base("Ana Pérez", "https://x.com/1"));
        let b = key(&base("ana pérez", "https://x.com/1"));
        assert_eq!(compare(&a, &b), SOURCE_WITH_OVERLAP);
    }

    #[test]
    fn test_url_plus_secondary_scores_source_overlap() {
        let a = key(&base("Ana Pérez", "https://x.com/1").with_region("Los Ríos"));
        let b = key(&base("Juan Soto", "https://x.com/1").with_region("los ríos"));
        assert_eq!(compare(&a, &b), SOURCE_WITH_OVERLAP);
    }

    #[test]
    fn test_phone_only_scores_phone_rule() {
        let a = key(&base("Ana Pérez", "https://x.com/1").with_phone("111-222"));
        let b = key(&base("Juan Soto", "https://y.com/2").with_phone("111222"));
        assert_eq!(compare(&a, &b), PHONE_ONLY);
    }

    #[test]
    fn test_name_only_scores_single_overlap() {
        let a = key(&base("Ana Pérez", "https://x.com/1"));
        let b = key(&base("Ana Pérez", "https://y.com/2"));
        assert_eq!(compare(&a, &b), SINGLE_OVERLAP);
    }

    #[test]
    fn test_single_secondary_scores_single_overlap() {
        let a = key(&base("Ana Pérez", "https://x.com/1").with_organization("UC"));
        let b = key(&base("Juan Soto", "https://y.com/2").with_organization("UC"));
        assert_eq!(compare(&a, &b), SINGLE_OVERLAP);
    }

    #[test]
    fn test_two_secondaries_without_name_score_single_overlap() {
        let a = key(
            &base("Ana Pérez", "https://x.com/1")
                .with_organization("UC")
                .with_region("Biobío"),
        );
        let b = key(
            &base("Juan Soto", "https://y.com/2")
                .with_organization("UC")
                .with_region("Biobío"),
        );
        assert_eq!(compare(&a, &b), SINGLE_OVERLAP);
    }

    #[test]
    fn test_name_plus_one_secondary_stays_unique() {
        // Name + exactly one secondary falls through every branch: the
        // name-with-secondary rule needs two secondaries, and the name-alone
        // rule needs zero.
        let a = key(&base("Ana Pérez", "https://x.com/2").with_organization("UC"));
        let b = key(&base("Ana Pérez", "https://x.com/1").with_organization("UC"));
        assert_eq!(compare(&a, &b), 1.0);
    }

    #[test]
    fn test_name_plus_two_secondaries_scores_name_with_secondary() {
        let a = key(
            &base("Ana Pérez", "https://x.com/1")
                .with_organization("UC")
                .with_position("Profesora"),
        );
        let b = key(
            &base("Ana Pérez", "https://y.com/2")
                .with_organization("UC")
                .with_position("profesora"),
        );
        assert_eq!(compare(&a, &b), NAME_WITH_SECONDARY);
    }

    #[test]
    fn test_three_matches_with_name_score_broad_overlap_with_name() {
        // name + org + phone: total 3 including the name.
        let a = key(
            &base("Ana Pérez", "https://x.com/1")
                .with_organization("UC")
                .with_phone("111222"),
        );
        let b = key(
            &base("Ana Pérez", "https://y.com/2")
                .with_organization("UC")
                .with_phone("111-222"),
        );
        assert_eq!(compare(&a, &b), BROAD_OVERLAP_WITH_NAME);
    }

    #[test]
    fn test_identical_clone_scores_broad_overlap() {
        let c = base("Ana Pérez", "https://x.com/1")
            .with_organization("UC")
            .with_position("Profesora")
            .with_region("Biobío")
            .with_phone("111222");
        let a = key(&c);
        let m = a.matches(&a);
        assert_eq!(m.total(), 6);
        assert_eq!(compare(&a, &a), BROAD_OVERLAP);
    }

    #[test]
    fn test_population_takes_minimum() {
        let candidate = key(&base("Ana Pérez", "https://x.com/1").with_phone("111222"));
        let harmless = key(&base("Juan Soto", "https://y.com/2"));
        let shared_phone = key(&base("Rosa Díaz", "https://z.com/3").with_phone("111 222"));
        let same_page = key(&base("Luis Vera", "https://x.com/1"));

        let population = [harmless.clone(), shared_phone.clone(), same_page.clone()];
        // Worst pair wins: phone-only 0.6 beats url-only 0.7.
        assert_eq!(score(&candidate, &population), PHONE_ONLY);

        // Order independence.
        let reversed = [same_page, shared_phone, harmless];
        assert_eq!(score(&candidate, &reversed), PHONE_ONLY);
    }

    #[test]
    fn test_score_stays_in_range() {
        let candidates = [
            base("Ana Pérez", "https://x.com/1")
                .with_organization("UC")
                .with_position("Profesora")
                .with_region("Biobío")
                .with_phone("111222"),
            base("Juan Soto", "https://x.com/1"),
            base("Rosa Díaz", "https://y.com/9"),
        ];
        let population: Vec<FieldKey> = candidates.iter().map(key).collect();
        for c in &population {
            let s = score(c, &population);
            assert!((0.0..=1.0).contains(&s), "score out of range: {s}");
        }
    }
}
