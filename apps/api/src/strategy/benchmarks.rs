//! Channel performance ranges quoted to the model so its projections stay grounded.

/// Inclusive range of a benchmark metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ChannelBenchmark {
    pub channel: &'static str,
    /// Cost per click in dollars.
    pub cpc: Option<Range>,
    /// Click-through rate in percent.
    pub ctr: Option<Range>,
    /// Conversion rate in percent.
    pub conversion: Option<Range>,
    /// Anything that does not fit the three metrics above.
    pub note: Option<&'static str>,
}

pub const BENCHMARKS: &[ChannelBenchmark] = &[
    ChannelBenchmark {
        channel: "Google Ads",
        cpc: Some(Range { low: 1.0, high: 5.0 }),
        ctr: Some(Range { low: 2.0, high: 5.0 }),
        conversion: Some(Range { low: 2.0, high: 4.0 }),
        note: None,
    },
    ChannelBenchmark {
        channel: "Facebook Ads",
        cpc: Some(Range { low: 0.5, high: 3.0 }),
        ctr: Some(Range { low: 1.0, high: 2.0 }),
        conversion: Some(Range { low: 1.0, high: 3.0 }),
        note: None,
    },
    ChannelBenchmark {
        channel: "Email Marketing",
        cpc: None,
        ctr: Some(Range { low: 2.0, high: 5.0 }),
        conversion: None,
        note: Some("open rate 15-25%, lists grow 10-25% monthly"),
    },
    ChannelBenchmark {
        channel: "SEO",
        cpc: None,
        ctr: None,
        conversion: None,
        note: Some("takes 3-6 months, can drive 20-40% of traffic long-term"),
    },
    ChannelBenchmark {
        channel: "Influencer Marketing",
        cpc: None,
        ctr: None,
        conversion: None,
        note: Some("micro-influencers cost $100-$500 per 10k followers"),
    },
];

fn money(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("${n:.0}")
    } else {
        format!("${n:.2}")
    }
}

fn percent(range: Range) -> String {
    format!("{}-{}%", range.low, range.high)
}

impl ChannelBenchmark {
    /// One prompt line, e.g. `- Google Ads: CPC $1-$5, CTR 2-5%, conversion rate 2-4%`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(cpc) = self.cpc {
            parts.push(format!("CPC {}-{}", money(cpc.low), money(cpc.high)));
        }
        if let Some(ctr) = self.ctr {
            parts.push(format!("CTR {}", percent(ctr)));
        }
        if let Some(conversion) = self.conversion {
            parts.push(format!("conversion rate {}", percent(conversion)));
        }
        if let Some(note) = self.note {
            parts.push(note.to_string());
        }
        format!("- {}: {}", self.channel, parts.join(", "))
    }
}

/// All benchmark lines joined for the prompt.
pub fn benchmark_block() -> String {
    BENCHMARKS
        .iter()
        .map(ChannelBenchmark::describe)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_ads_line() {
        assert_eq!(
            BENCHMARKS[0].describe(),
            "- Google Ads: CPC $1-$5, CTR 2-5%, conversion rate 2-4%"
        );
    }

    #[test]
    fn test_fractional_cpc_keeps_cents() {
        assert_eq!(
            BENCHMARKS[1].describe(),
            "- Facebook Ads: CPC $0.50-$3, CTR 1-2%, conversion rate 1-3%"
        );
    }

    #[test]
    fn test_block_lists_every_channel() {
        let block = benchmark_block();
        assert_eq!(block.lines().count(), BENCHMARKS.len());
        assert!(block.contains("Influencer Marketing"));
    }
}
