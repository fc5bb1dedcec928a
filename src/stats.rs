use chrono::NaiveDate;
use std::collections::HashMap;

/// One row of the daily surveillance feed: new cases and deaths reported by a
/// state (postal code) on a submission date.
#[derive(Clone, Debug)]
pub struct DailyRecord {
    pub state: String,
    pub submission_date: NaiveDate,
    pub new_cases: i64,
    pub new_deaths: i64,
}

/// One row of the census table: a full state name and its 2020 population.
#[derive(Clone, Debug)]
pub struct PopulationRecord {
    pub state: String,
    pub population: u64,
}

/// Per-state summary combining case/death totals with population-normalized
/// rates. Rates are percentages (cases per 100 residents).
#[derive(Clone, Debug)]
pub struct StateAggregate {
    pub state: String,
    pub population: u64,
    pub abs_cases: i64,
    pub abs_deaths: i64,
    pub rel_cases: f64,
    pub rel_deaths: f64,
}

/// Inclusive date interval restricting which daily records contribute.
pub type DateRange = (NaiveDate, NaiveDate);

/// The numeric field used to rank, color, and chart states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Population,
    AbsCases,
    AbsDeaths,
    RelCases,
    RelDeaths,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Population,
        Metric::AbsCases,
        Metric::AbsDeaths,
        Metric::RelCases,
        Metric::RelDeaths,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Population => "Population",
            Metric::AbsCases => "Cases (absolute)",
            Metric::AbsDeaths => "Deaths (absolute)",
            Metric::RelCases => "Cases (relative)",
            Metric::RelDeaths => "Deaths (relative)",
        }
    }

    /// Whether the metric is a percentage rather than a count.
    pub fn is_relative(self) -> bool {
        matches!(self, Metric::RelCases | Metric::RelDeaths)
    }

    pub fn next(self) -> Metric {
        let idx = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Metric {
        let idx = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Read this metric's value out of an aggregate.
    pub fn value_of(self, agg: &StateAggregate) -> f64 {
        match self {
            Metric::Population => agg.population as f64,
            Metric::AbsCases => agg.abs_cases as f64,
            Metric::AbsDeaths => agg.abs_deaths as f64,
            Metric::RelCases => agg.rel_cases,
            Metric::RelDeaths => agg.rel_deaths,
        }
    }
}

/// Build one `StateAggregate` per distinct state code in `records`, optionally
/// restricted to an inclusive date range.
///
/// Records are grouped by postal code in first-seen order. Each group's full
/// name comes from `resolve`; codes the resolver does not know keep the postal
/// code as their label. Population sums every census row whose name matches
/// (zero matches contribute 0, which makes the relative rates non-finite; that
/// is preserved, not clamped).
pub fn aggregate<'n, F>(
    records: &[DailyRecord],
    populations: &[PopulationRecord],
    date_range: Option<DateRange>,
    resolve: F,
) -> Vec<StateAggregate>
where
    F: Fn(&str) -> Option<&'n str>,
{
    // Group sums by postal code, keeping first-seen order for stable output
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, (i64, i64)> = HashMap::new();

    for rec in records {
        if let Some((start, end)) = date_range {
            if rec.submission_date < start || rec.submission_date > end {
                continue;
            }
        }
        let entry = sums.entry(rec.state.as_str()).or_insert_with(|| {
            order.push(rec.state.as_str());
            (0, 0)
        });
        entry.0 += rec.new_cases;
        entry.1 += rec.new_deaths;
    }

    order
        .into_iter()
        .map(|code| {
            let (abs_cases, abs_deaths) = sums[code];
            let name = resolve(code).unwrap_or(code);

            let population: u64 = populations
                .iter()
                .filter(|p| p.state == name)
                .map(|p| p.population)
                .sum();

            let rel_cases = abs_cases as f64 / population as f64 * 100.0;
            let rel_deaths = abs_deaths as f64 / population as f64 * 100.0;

            StateAggregate {
                state: name.to_string(),
                population,
                abs_cases,
                abs_deaths,
                rel_cases,
                rel_deaths,
            }
        })
        .collect()
}

/// Sort aggregates by `metric` and keep the first `limit`.
///
/// The sort is stable: aggregates with equal keys keep their pre-sort relative
/// order. Non-finite rates (zero-population states) order via `total_cmp`, so
/// NaN sorts above +inf in descending mode rather than poisoning the sort.
pub fn rank_and_select(
    mut aggregates: Vec<StateAggregate>,
    metric: Metric,
    descending: bool,
    limit: usize,
) -> Vec<StateAggregate> {
    aggregates.sort_by(|a, b| {
        let ord = metric.value_of(a).total_cmp(&metric.value_of(b));
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    aggregates.truncate(limit);
    aggregates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(state: &str, day: u32, cases: i64, deaths: i64) -> DailyRecord {
        DailyRecord {
            state: state.to_string(),
            submission_date: date(2021, 3, day),
            new_cases: cases,
            new_deaths: deaths,
        }
    }

    fn pop(state: &str, population: u64) -> PopulationRecord {
        PopulationRecord {
            state: state.to_string(),
            population,
        }
    }

    fn resolve(code: &str) -> Option<&'static str> {
        match code {
            "CA" => Some("California"),
            "TX" => Some("Texas"),
            "VT" => Some("Vermont"),
            _ => None,
        }
    }

    #[test]
    fn test_sums_per_state() {
        let records = vec![
            rec("CA", 1, 10, 1),
            rec("CA", 2, 5, 0),
            rec("TX", 1, 3, 1),
        ];
        let populations = vec![pop("California", 39_000_000), pop("Texas", 29_000_000)];

        let aggs = aggregate(&records, &populations, None, resolve);

        assert_eq!(aggs.len(), 2);
        let ca = &aggs[0];
        assert_eq!(ca.state, "California");
        assert_eq!(ca.population, 39_000_000);
        assert_eq!(ca.abs_cases, 15);
        assert_eq!(ca.abs_deaths, 1);
        assert!((ca.rel_cases - 15.0 / 39_000_000.0 * 100.0).abs() < 1e-12);

        let tx = &aggs[1];
        assert_eq!(tx.state, "Texas");
        assert_eq!(tx.abs_cases, 3);
        assert_eq!(tx.abs_deaths, 1);
    }

    #[test]
    fn test_one_aggregate_per_distinct_code() {
        let records = vec![
            rec("CA", 1, 1, 0),
            rec("TX", 1, 1, 0),
            rec("CA", 2, 1, 0),
            rec("VT", 3, 1, 0),
            rec("TX", 4, 1, 0),
        ];
        let aggs = aggregate(&records, &[], None, resolve);
        assert_eq!(aggs.len(), 3);
    }

    #[test]
    fn test_date_filter_inclusive_bounds() {
        let records = vec![rec("CA", 1, 1, 0), rec("CA", 5, 2, 0), rec("CA", 9, 4, 0)];
        let range = Some((date(2021, 3, 1), date(2021, 3, 5)));
        let aggs = aggregate(&records, &[], range, resolve);
        // Both boundary days count, the day after the end does not
        assert_eq!(aggs[0].abs_cases, 3);
    }

    #[test]
    fn test_filter_excluding_everything_yields_empty() {
        let records = vec![rec("CA", 1, 1, 0), rec("TX", 2, 1, 0)];
        let range = Some((date(2020, 1, 1), date(2020, 1, 31)));
        let aggs = aggregate(&records, &[], range, resolve);
        assert!(aggs.is_empty());
    }

    #[test]
    fn test_full_range_equals_no_range() {
        let records = vec![
            rec("CA", 3, 7, 1),
            rec("TX", 1, 2, 0),
            rec("CA", 9, 1, 1),
        ];
        let populations = vec![pop("California", 100), pop("Texas", 200)];

        let all = aggregate(&records, &populations, None, resolve);
        let full = aggregate(
            &records,
            &populations,
            Some((date(2021, 3, 1), date(2021, 3, 9))),
            resolve,
        );

        assert_eq!(all.len(), full.len());
        for (a, b) in all.iter().zip(full.iter()) {
            assert_eq!(a.state, b.state);
            assert_eq!(a.abs_cases, b.abs_cases);
            assert_eq!(a.abs_deaths, b.abs_deaths);
        }
    }

    #[test]
    fn test_unresolved_code_keeps_postal_label() {
        let records = vec![rec("ZZ", 1, 4, 0)];
        let aggs = aggregate(&records, &[pop("California", 100)], None, resolve);
        assert_eq!(aggs[0].state, "ZZ");
        assert_eq!(aggs[0].population, 0);
        assert!(!aggs[0].rel_cases.is_finite());
    }

    #[test]
    fn test_population_rows_sum() {
        // Census source may carry several rows for one name
        let records = vec![rec("CA", 1, 10, 0)];
        let populations = vec![pop("California", 60), pop("California", 40)];
        let aggs = aggregate(&records, &populations, None, resolve);
        assert_eq!(aggs[0].population, 100);
        assert!((aggs[0].rel_cases - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_records() {
        let aggs = aggregate(&[], &[pop("California", 100)], None, resolve);
        assert!(aggs.is_empty());
    }

    #[test]
    fn test_rank_descending_top_ten() {
        let mut records = Vec::new();
        for (i, code) in ["CA", "TX", "VT", "AA", "BB", "CC", "DD", "EE", "FF", "GG", "HH", "II"]
            .iter()
            .enumerate()
        {
            records.push(rec(code, 1, i as i64, 0));
        }
        let aggs = aggregate(&records, &[], None, resolve);
        let top = rank_and_select(aggs, Metric::AbsCases, true, 10);

        assert_eq!(top.len(), 10);
        for pair in top.windows(2) {
            assert!(pair[0].abs_cases >= pair[1].abs_cases);
        }
        assert_eq!(top[0].abs_cases, 11);
    }

    #[test]
    fn test_rank_limit_exceeds_input() {
        let records = vec![rec("CA", 1, 1, 0), rec("TX", 1, 2, 0)];
        let aggs = aggregate(&records, &[], None, resolve);
        let top = rank_and_select(aggs, Metric::AbsCases, true, 10);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let records = vec![
            rec("CA", 1, 5, 0),
            rec("TX", 1, 5, 0),
            rec("VT", 1, 5, 0),
        ];
        let aggs = aggregate(&records, &[], None, resolve);
        let ranked = rank_and_select(aggs, Metric::AbsCases, true, 3);
        assert_eq!(ranked[0].state, "California");
        assert_eq!(ranked[1].state, "Texas");
        assert_eq!(ranked[2].state, "Vermont");
    }

    #[test]
    fn test_rank_ascending_bottom() {
        let records = vec![rec("CA", 1, 9, 0), rec("TX", 1, 1, 0), rec("VT", 1, 4, 0)];
        let aggs = aggregate(&records, &[], None, resolve);
        let bottom = rank_and_select(aggs, Metric::AbsCases, false, 2);
        assert_eq!(bottom[0].state, "Texas");
        assert_eq!(bottom[1].state, "Vermont");
    }

    #[test]
    fn test_metric_cycle_covers_all() {
        let mut m = Metric::Population;
        for _ in 0..Metric::ALL.len() {
            m = m.next();
        }
        assert_eq!(m, Metric::Population);
        assert_eq!(Metric::Population.prev(), Metric::RelDeaths);
    }
}
