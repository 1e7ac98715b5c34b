//! Threshold-rule classification of a series summary into a qualitative
//! market signal.

use serde::{Deserialize, Serialize};

use market_core::TrendTag;

use crate::models::SeriesFinanceSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Hot,
    Opportunity,
    Momentum,
    Warning,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub priority: u8,
    pub description: String,
}

/// Evaluate every rule, highest priority first.
fn evaluate(summary: &SeriesFinanceSummary, market_median_premium: Option<f64>) -> Vec<Signal> {
    let m = &summary.metrics;
    let mut matched = Vec::new();

    // Hot: strong week backed by a high score
    if let (Some(ret7), Some(score)) = (m.return_7d, m.score) {
        if ret7 > 0.05 && score >= 70 {
            matched.push(Signal {
                kind: SignalKind::Hot,
                priority: 5,
                description: format!(
                    "7-day return {:+.1}% with score {}",
                    ret7 * 100.0,
                    score
                ),
            });
        }
    }

    // Opportunity: still cheap against retail or against the wider market
    if let Some(premium) = m.premium_now {
        let below_market = market_median_premium.filter(|median| premium < median - 0.10);
        if let Some(median) = below_market {
            matched.push(Signal {
                kind: SignalKind::Opportunity,
                priority: 4,
                description: format!(
                    "premium {:+.1}% sits more than 10 points under the market median {:+.1}%",
                    premium * 100.0,
                    median * 100.0
                ),
            });
        } else if premium < 0.15
            && summary.trend_30d == TrendTag::Up
            && m.score.map_or(false, |s| s >= 60)
        {
            matched.push(Signal {
                kind: SignalKind::Opportunity,
                priority: 4,
                description: format!(
                    "premium {:+.1}% with a 30-day uptrend and score {}",
                    premium * 100.0,
                    m.score.unwrap_or(0)
                ),
            });
        }
    }

    // Momentum: sustained rise across both windows
    if let Some(ret30) = m.return_30d {
        if ret30 > 0.10 && summary.trend_7d == TrendTag::Up && summary.trend_30d == TrendTag::Up
        {
            matched.push(Signal {
                kind: SignalKind::Momentum,
                priority: 3,
                description: format!(
                    "30-day return {:+.1}% with 7- and 30-day uptrends",
                    ret30 * 100.0
                ),
            });
        }
    }

    // Warning: falling in a downtrend, or simply too jumpy
    if let Some(ret7) = m
        .return_7d
        .filter(|r| *r < -0.03 && summary.trend_30d == TrendTag::Down)
    {
        matched.push(Signal {
            kind: SignalKind::Warning,
            priority: 2,
            description: format!(
                "7-day return {:+.1}% in a 30-day downtrend",
                ret7 * 100.0
            ),
        });
    } else if let Some(vol) = m.volatility_30d.filter(|v| *v > 0.15) {
        matched.push(Signal {
            kind: SignalKind::Warning,
            priority: 2,
            description: format!("30-day volatility {:.1}%", vol * 100.0),
        });
    }

    // Stable: quiet series with a decent score
    if let (Some(vol), Some(score)) = (m.volatility_30d, m.score) {
        if vol < 0.05 && score >= 65 {
            matched.push(Signal {
                kind: SignalKind::Stable,
                priority: 1,
                description: format!(
                    "30-day volatility {:.1}% with score {}",
                    vol * 100.0,
                    score
                ),
            });
        }
    }

    matched
}

/// First matching rule, or `None` when nothing fires.
pub fn detect_signal(
    summary: &SeriesFinanceSummary,
    market_median_premium: Option<f64>,
) -> Option<Signal> {
    evaluate(summary, market_median_premium).into_iter().next()
}

/// Every matching rule, highest priority first.
pub fn detect_signals(
    summary: &SeriesFinanceSummary,
    market_median_premium: Option<f64>,
) -> Vec<Signal> {
    let mut signals = evaluate(summary, market_median_premium);
    signals.sort_by(|a, b| b.priority.cmp(&a.priority));
    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::FinanceMetrics;

    fn summary(metrics: FinanceMetrics, trend_7d: TrendTag, trend_30d: TrendTag) -> SeriesFinanceSummary {
        SeriesFinanceSummary {
            name: "Test".to_string(),
            retail_price: Some(100.0),
            index_count: 10,
            index_last_date: None,
            metrics,
            trend_7d,
            trend_30d,
            min_price: None,
            max_price: None,
            item_count: 3,
        }
    }

    #[test]
    fn test_hot_signal() {
        let s = summary(
            FinanceMetrics {
                return_7d: Some(0.06),
                score: Some(75),
                ..Default::default()
            },
            TrendTag::Up,
            TrendTag::Stable,
        );
        let signal = detect_signal(&s, None).unwrap();
        assert_eq!(signal.kind, SignalKind::Hot);
        assert!(signal.description.contains("+6.0%"));
        assert!(signal.description.contains("75"));
    }

    #[test]
    fn test_hot_outranks_stable() {
        // Satisfies both the hot and the stable rule
        let s = summary(
            FinanceMetrics {
                return_7d: Some(0.08),
                volatility_30d: Some(0.02),
                score: Some(80),
                ..Default::default()
            },
            TrendTag::Up,
            TrendTag::Up,
        );
        let first = detect_signal(&s, None).unwrap();
        assert_eq!(first.kind, SignalKind::Hot);

        let all = detect_signals(&s, None);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].kind, SignalKind::Hot);
        assert_eq!(all[1].kind, SignalKind::Stable);
        assert!(all[0].priority > all[1].priority);
    }

    #[test]
    fn test_opportunity_cheap_uptrend() {
        let s = summary(
            FinanceMetrics {
                premium_now: Some(0.10),
                score: Some(65),
                ..Default::default()
            },
            TrendTag::Stable,
            TrendTag::Up,
        );
        let signal = detect_signal(&s, None).unwrap();
        assert_eq!(signal.kind, SignalKind::Opportunity);
    }

    #[test]
    fn test_opportunity_below_market_median() {
        // Premium well under the market median, nothing else notable
        let s = summary(
            FinanceMetrics {
                premium_now: Some(0.05),
                ..Default::default()
            },
            TrendTag::Stable,
            TrendTag::Stable,
        );
        let signal = detect_signal(&s, Some(0.30)).unwrap();
        assert_eq!(signal.kind, SignalKind::Opportunity);
        assert!(signal.description.contains("market median"));
        // Without the market context the rule does not fire
        assert!(detect_signal(&s, None).is_none());
    }

    #[test]
    fn test_momentum_signal() {
        let s = summary(
            FinanceMetrics {
                return_30d: Some(0.12),
                ..Default::default()
            },
            TrendTag::Up,
            TrendTag::Up,
        );
        let signal = detect_signal(&s, None).unwrap();
        assert_eq!(signal.kind, SignalKind::Momentum);
    }

    #[test]
    fn test_warning_on_drop_and_on_volatility() {
        let falling = summary(
            FinanceMetrics {
                return_7d: Some(-0.04),
                ..Default::default()
            },
            TrendTag::Down,
            TrendTag::Down,
        );
        let signal = detect_signal(&falling, None).unwrap();
        assert_eq!(signal.kind, SignalKind::Warning);
        assert!(signal.description.contains("downtrend"));

        let jumpy = summary(
            FinanceMetrics {
                volatility_30d: Some(0.20),
                ..Default::default()
            },
            TrendTag::Stable,
            TrendTag::Stable,
        );
        let signal = detect_signal(&jumpy, None).unwrap();
        assert_eq!(signal.kind, SignalKind::Warning);
        assert!(signal.description.contains("volatility"));
    }

    #[test]
    fn test_no_signal_on_quiet_series() {
        let s = summary(
            FinanceMetrics {
                return_7d: Some(0.01),
                volatility_30d: Some(0.08),
                score: Some(50),
                ..Default::default()
            },
            TrendTag::Stable,
            TrendTag::Stable,
        );
        assert!(detect_signal(&s, None).is_none());
        assert!(detect_signals(&s, None).is_empty());
    }

    #[test]
    fn test_null_metrics_never_fire() {
        let s = summary(FinanceMetrics::default(), TrendTag::Na, TrendTag::Na);
        assert!(detect_signal(&s, Some(0.30)).is_none());
    }
}
