#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use market_core::{MarketStatus, RawPricePoint, TrendTag};

    use crate::aggregate::daily_median_series;
    use crate::isp::*;

    fn raw(date: &str, price: f64) -> RawPricePoint {
        RawPricePoint {
            date: date.to_string(),
            price,
        }
    }

    fn item(name: &str, retail: f64, observations: &[(&str, f64)]) -> IndexItem {
        IndexItem {
            name: name.to_string(),
            prices: observations.iter().map(|(d, p)| raw(d, *p)).collect(),
            retail_price: Some(retail),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_daily_median_across_items() {
        let series = daily_median_series(&[
            vec![raw("2024-01-01", 10.0), raw("2024-01-02", 20.0)],
            vec![raw("2024-01-01", 30.0)],
            vec![raw("2024-01-01", 20.0), raw("2024-01-03", 40.0)],
        ]);
        assert_eq!(series.len(), 3);
        // Three items on day one: median of {10, 30, 20}
        assert_eq!(series.points[0].price, 20.0);
        // Only one item on each later day
        assert_eq!(series.points[1].price, 20.0);
        assert_eq!(series.points[2].price, 40.0);
    }

    #[test]
    fn test_daily_median_empty() {
        assert!(daily_median_series(&[]).is_empty());
        assert!(daily_median_series(&[vec![]]).is_empty());
    }

    #[test]
    fn test_index_baseline_is_100() {
        let history = build_isp_index(&[
            item("a", 50.0, &[("2024-01-01", 100.0), ("2024-01-02", 110.0)]),
            item("b", 60.0, &[("2024-01-01", 200.0)]),
        ]);
        assert_eq!(history[0].value, 100.0);
        assert_eq!(history[0].daily_change, 0.0);
        assert_eq!(history[0].item_count, 2);
    }

    #[test]
    fn test_index_chains_overlapping_changes() {
        let history = build_isp_index(&[
            item(
                "a",
                50.0,
                &[("2024-01-01", 100.0), ("2024-01-02", 110.0)],
            ),
            item(
                "b",
                60.0,
                &[("2024-01-01", 200.0), ("2024-01-02", 190.0)],
            ),
        ]);
        assert_eq!(history.len(), 2);
        // Average of +10% and -5%
        let expected_change = (0.10 + (190.0 / 200.0 - 1.0)) / 2.0;
        assert!((history[1].daily_change - expected_change).abs() < 1e-12);
        assert!((history[1].value - 100.0 * (1.0 + expected_change)).abs() < 1e-9);
        assert_eq!(history[1].item_count, 2);
    }

    #[test]
    fn test_index_carries_flat_without_overlap() {
        // The two items never share consecutive observed days
        let history = build_isp_index(&[
            item("a", 50.0, &[("2024-01-01", 100.0)]),
            item("b", 60.0, &[("2024-01-02", 300.0)]),
        ]);
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].value, 100.0);
        assert_eq!(history[1].daily_change, 0.0);
        assert_eq!(history[1].item_count, 0);
    }

    #[test]
    fn test_index_skips_non_qualifying_items() {
        let mut no_retail = item("x", 50.0, &[("2024-01-01", 100.0)]);
        no_retail.retail_price = None;
        let history = build_isp_index(&[
            no_retail,
            item("y", 0.0, &[("2024-01-01", 100.0)]),
            item("z", 50.0, &[]),
        ]);
        assert!(history.is_empty());
    }

    #[test]
    fn test_index_not_retroactive_when_item_added() {
        let base = vec![
            item(
                "a",
                50.0,
                &[
                    ("2024-01-01", 100.0),
                    ("2024-01-02", 105.0),
                    ("2024-01-03", 103.0),
                ],
            ),
            item(
                "b",
                60.0,
                &[
                    ("2024-01-01", 80.0),
                    ("2024-01-02", 82.0),
                    ("2024-01-03", 85.0),
                ],
            ),
        ];
        let before = build_isp_index(&base);

        // A new item first observed on 2024-01-03
        let mut grown = base.clone();
        grown.push(item(
            "c",
            40.0,
            &[("2024-01-03", 500.0), ("2024-01-04", 550.0)],
        ));
        let after = build_isp_index(&grown);

        // Every point before the newcomer's first observation is unchanged
        for (old, new) in before.iter().zip(after.iter()) {
            if new.date < date("2024-01-03") {
                assert_eq!(old, new);
            }
        }
        // The newcomer has no 01-02 observation, so even 01-03 is untouched
        assert_eq!(before[2], after[2]);
        assert_eq!(after.len(), 4);
    }

    #[test]
    fn test_isp_from_items_filters() {
        let history = isp_from_items(&[
            item("a", 50.0, &[("2024-01-01", 100.0)]),
            item("b", 0.0, &[("2024-01-01", 999.0)]),
        ]);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].item_count, 1);
    }

    #[test]
    fn test_summary_empty_history_is_neutral() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let summary = isp_summary(&[], now);
        assert_eq!(summary.current, 100.0);
        assert_eq!(summary.change_7d, None);
        assert_eq!(summary.change_ytd, None);
        assert_eq!(summary.change_since_base, None);
        assert_eq!(summary.last_update, None);
        assert_eq!(summary.trend, TrendTag::Stable);
        assert_eq!(summary.market_status, MarketStatus::FairlyValued);
    }

    #[test]
    fn test_summary_lookbacks_and_trend() {
        let history: Vec<IndexPoint> = (0..40)
            .map(|i| IndexPoint {
                date: date("2024-01-01") + chrono::Duration::days(i),
                value: 100.0 + i as f64,
                item_count: 3,
                daily_change: 0.0,
            })
            .collect();
        let now = Utc.with_ymd_and_hms(2024, 2, 9, 12, 0, 0).unwrap();
        let summary = isp_summary(&history, now);

        assert_eq!(summary.current, 139.0);
        assert_eq!(summary.last_update, Some(date("2024-02-09")));
        // 7 days back lands on 2024-02-02, value 132
        assert!((summary.change_7d.unwrap() - (139.0 - 132.0) / 132.0).abs() < 1e-12);
        // 30 days back lands on 2024-01-10, value 109
        assert!((summary.change_30d.unwrap() - (139.0 - 109.0) / 109.0).abs() < 1e-12);
        // Not enough history for 90 days
        assert_eq!(summary.change_90d, None);
        // YTD reference is the very first point
        assert!((summary.change_ytd.unwrap() - 0.39).abs() < 1e-12);
        assert!((summary.change_since_base.unwrap() - 0.39).abs() < 1e-12);
        assert_eq!(summary.trend, TrendTag::Up);
        assert_eq!(summary.market_status, MarketStatus::FairlyValued);
    }

    #[test]
    fn test_variation_between_dates_sorted_by_magnitude() {
        let items = vec![
            item(
                "small mover",
                50.0,
                &[("2024-01-01", 100.0), ("2024-01-02", 101.0)],
            ),
            item(
                "big mover",
                50.0,
                &[("2024-01-01", 100.0), ("2024-01-02", 80.0)],
            ),
            item("absent", 50.0, &[("2024-01-01", 100.0)]),
        ];
        let variations =
            variation_between_dates(&items, date("2024-01-01"), date("2024-01-02"));
        assert_eq!(variations.len(), 2);
        assert_eq!(variations[0].name, "big mover");
        assert!((variations[0].change + 0.20).abs() < 1e-12);
        assert_eq!(variations[1].name, "small mover");
    }

    #[test]
    fn test_end_to_end_summary_overvalued_flip() {
        // Three items, three shared days, same retail price
        let items = vec![
            item(
                "a",
                100.0,
                &[
                    ("2024-03-01", 100.0),
                    ("2024-03-02", 150.0),
                    ("2024-03-03", 160.0),
                ],
            ),
            item(
                "b",
                100.0,
                &[
                    ("2024-03-01", 100.0),
                    ("2024-03-02", 170.0),
                    ("2024-03-03", 180.0),
                ],
            ),
            item(
                "c",
                100.0,
                &[
                    ("2024-03-01", 100.0),
                    ("2024-03-02", 160.0),
                    ("2024-03-03", 200.0),
                ],
            ),
        ];
        let history = build_isp_index(&items);
        assert_eq!(history.len(), 3);

        let change_day2 = (0.50 + 0.70 + 0.60) / 3.0;
        let change_day3 = ((160.0 / 150.0 - 1.0)
            + (180.0 / 170.0 - 1.0)
            + (200.0 / 160.0 - 1.0))
            / 3.0;
        let expected = 100.0 * (1.0 + change_day2) * (1.0 + change_day3);
        assert!((history[2].value - expected).abs() < 1e-9);

        let now = Utc.with_ymd_and_hms(2024, 3, 3, 18, 0, 0).unwrap();
        let summary = isp_summary(&history, now);
        assert!((summary.current - expected).abs() < 1e-9);
        assert!(summary.current >= 150.0);
        assert_eq!(summary.market_status, MarketStatus::Overvalued);
        assert_eq!(summary.history.len(), 3);
    }
}
