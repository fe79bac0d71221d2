//! Deterministic fallback strategy, used whenever the remote generator fails.
//!
//! Output depends only on the parsed budget. Each tier has a fixed campaign
//! set and allocation table; money and reach are fixed fractions of the budget.

use serde::Serialize;

use crate::models::strategy::{BudgetItem, Campaign, Segment, StrategyData, StrategyOption};

/// Budget assumed when the answer is missing, unparsable or not positive.
pub const DEFAULT_BUDGET: f64 = 5000.0;
/// Low tier is strictly below this.
pub const MEDIUM_TIER_MIN: f64 = 2000.0;
/// High tier starts here.
pub const HIGH_TIER_MIN: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Low,
    Medium,
    High,
}

impl BudgetTier {
    pub fn for_budget(budget: f64) -> Self {
        if budget < MEDIUM_TIER_MIN {
            BudgetTier::Low
        } else if budget < HIGH_TIER_MIN {
            BudgetTier::Medium
        } else {
            BudgetTier::High
        }
    }
}

/// Reads a budget answer such as `"5000"`, `"$12,500"`, `"3000/month"` or `"1e4"`.
///
/// The longest leading numeric prefix wins, exponent included. Anything that
/// does not yield a positive finite number resolves to [`DEFAULT_BUDGET`].
pub fn parse_budget(raw: &str) -> f64 {
    let cleaned: String = raw.trim().trim_start_matches('$').replace(',', "");
    let prefix = numeric_prefix(&cleaned);

    // A prefix like "1.2.3" may not parse whole; back off one char at a time.
    (1..=prefix.len())
        .rev()
        .find_map(|len| prefix[..len].parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n > 0.0)
        .unwrap_or(DEFAULT_BUDGET)
}

/// Sign, digits and dots, then an optional exponent that has at least one digit.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mantissa_start = end;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }

    if end > mantissa_start && matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let digits_start = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > digits_start {
            end = exp;
        }
    }

    &s[..end]
}

/// Builds the full fallback strategy for a raw budget answer.
pub fn fallback_strategy(raw_budget: &str) -> StrategyData {
    strategy_for_budget(parse_budget(raw_budget))
}

/// Builds the fallback strategy for an already parsed budget.
pub fn strategy_for_budget(budget: f64) -> StrategyData {
    let budget = if budget.is_finite() && budget > 0.0 {
        budget
    } else {
        DEFAULT_BUDGET
    };

    let tier = BudgetTier::for_budget(budget);
    let (campaigns, budget_allocation) = match tier {
        BudgetTier::Low => (low_tier_campaigns(budget), low_tier_allocation(budget)),
        BudgetTier::Medium => (medium_tier_campaigns(budget), medium_tier_allocation(budget)),
        BudgetTier::High => (high_tier_campaigns(budget), high_tier_allocation(budget)),
    };

    StrategyData {
        campaigns,
        budget_allocation,
        target_segments: vec![primary_segment(budget)],
        actionable_tips: roadmap_tips(),
        strategy_options: vec![growth_option(budget)],
    }
}

/// Whole-dollar share of the budget, in basis points. Integer ratios keep
/// `floor` exact for whole-dollar budgets.
fn share(budget: f64, basis_points: u32) -> u64 {
    (budget * f64::from(basis_points) / 10_000.0).floor() as u64
}

/// Audience estimate from spend. Saturates for absurdly large budgets.
fn reach(spend: u64, people_per_dollar: u64) -> u64 {
    spend.saturating_mul(people_per_dollar)
}

fn campaign(
    name: &str,
    channel: &str,
    budget: u64,
    weeks: u32,
    expected_reach: u64,
    description: &str,
    cost_breakdown: String,
) -> Campaign {
    Campaign {
        name: name.to_string(),
        channel: channel.to_string(),
        budget,
        timeline: format!("{weeks} weeks"),
        expected_reach,
        description: Some(description.to_string()),
        cost_breakdown: Some(cost_breakdown),
    }
}

fn allocation(budget: f64, rows: &[(&str, u8, &str)]) -> Vec<BudgetItem> {
    rows.iter()
        .map(|(category, percentage, explanation)| BudgetItem {
            category: category.to_string(),
            amount: share(budget, u32::from(*percentage) * 100),
            percentage: *percentage,
            explanation: Some(explanation.to_string()),
        })
        .collect()
}

// Low tier: organic first, no paid social.

fn low_tier_campaigns(budget: f64) -> Vec<Campaign> {
    vec![
        campaign(
            "Community Content Program",
            "Content Marketing",
            share(budget, 3000),
            12,
            share(budget, 5000),
            "Consistent posting, community engagement and user-generated content to build an organic following.",
            "Content creation tools $50/month, scheduling tool $15/month, remainder for boosting top posts".to_string(),
        ),
        campaign(
            "Google Business Profile & Local SEO",
            "SEO",
            share(budget, 4000),
            16,
            share(budget, 3000),
            "Optimize for local search, gather reviews and publish location-based content.",
            "SEO tools $99/month, content creation $200/month, local citations $100".to_string(),
        ),
        campaign(
            "Email List Building",
            "Email",
            share(budget, 2000),
            8,
            reach(share(budget, 2000), 5),
            "Lead magnet and welcome sequence that turns first-time visitors into subscribers.",
            "Email platform free tier to $20/month, lead magnet design $100".to_string(),
        ),
    ]
}

fn low_tier_allocation(budget: f64) -> Vec<BudgetItem> {
    allocation(
        budget,
        &[
            ("Content Creation", 40, "Graphics, copywriting and short video for organic growth"),
            ("Marketing Tools", 25, "Canva Pro, scheduling, email platform and basic analytics"),
            ("Paid Promotion", 25, "Small boosts behind the best-performing organic content"),
            ("Testing & Optimization", 10, "A/B tests on content formats and posting times"),
        ],
    )
}

// Medium tier: paid social and search, email as the retention loop.

fn medium_tier_campaigns(budget: f64) -> Vec<Campaign> {
    let social = share(budget, 3500);
    let search = share(budget, 3000);
    let email = share(budget, 1500);
    vec![
        campaign(
            "Facebook & Instagram Ads Campaign",
            "Social Media",
            social,
            10,
            reach(social, 15),
            "Targeted social advertising built on lookalike audiences and interest-based targeting.",
            format!(
                "Ad spend 80% (${}), creative production 15%, management 5%",
                share(budget, 2800)
            ),
        ),
        campaign(
            "Google Ads Search Campaign",
            "PPC",
            search,
            8,
            reach(search, 8),
            "High-intent keywords for the product paired with optimized landing pages.",
            format!(
                "Ad spend 85% (${}), landing page optimization $200, keyword research tools $100",
                share(budget, 2550)
            ),
        ),
        campaign(
            "Email Nurture Sequence",
            "Email",
            email,
            12,
            reach(email, 20),
            "Automated welcome and re-engagement flows that convert paid traffic into repeat buyers.",
            "Email platform $50-$150/month, copywriting and templates for the remainder".to_string(),
        ),
    ]
}

fn medium_tier_allocation(budget: f64) -> Vec<BudgetItem> {
    allocation(
        budget,
        &[
            ("Paid Social", 35, "Meta ads spend, creative refreshes every two weeks"),
            ("Search Ads", 30, "Google Ads spend on high-intent keywords"),
            ("Email & Automation", 15, "Email platform and nurture sequence production"),
            ("Content & Creative", 12, "Ad creative, landing page copy and visuals"),
            ("Testing Buffer", 8, "Reserve for audience and creative experiments"),
        ],
    )
}

// High tier: adds influencers and long-horizon SEO on top of paid media.

fn high_tier_campaigns(budget: f64) -> Vec<Campaign> {
    let social = share(budget, 3000);
    let search = share(budget, 2500);
    let influencer = share(budget, 2000);
    let seo = share(budget, 1500);
    let email = share(budget, 1000);
    vec![
        campaign(
            "Paid Social Scale-Up",
            "Social Media",
            social,
            12,
            reach(social, 15),
            "Always-on prospecting and retargeting across Meta and TikTok with weekly creative testing.",
            format!("Ad spend 80% (${}), creative 15%, management 5%", share(budget, 2400)),
        ),
        campaign(
            "Google Search & Shopping",
            "PPC",
            search,
            12,
            reach(search, 8),
            "Search and Shopping campaigns covering brand, category and competitor terms.",
            format!(
                "Ad spend 85% (${}), feed management and bidding tools 15%",
                share(budget, 2125)
            ),
        ),
        campaign(
            "Micro-Influencer Partnerships",
            "Influencer Marketing",
            influencer,
            8,
            reach(influencer, 33),
            "Sponsored content with micro-influencers whose audiences match the target segments.",
            "Creator fees $100-$500 per 10k followers, product seeding, tracking links".to_string(),
        ),
        campaign(
            "SEO Content Program",
            "SEO",
            seo,
            24,
            reach(seo, 5),
            "Keyword-led articles and landing pages that compound organic traffic over 3-6 months.",
            "SEO platform $130/month, writers and editing for the remainder".to_string(),
        ),
        campaign(
            "Email Lifecycle Automation",
            "Email",
            email,
            12,
            reach(email, 20),
            "Segmented lifecycle flows: welcome, browse abandonment, win-back.",
            "Marketing automation platform $300/month, design and copy for the remainder".to_string(),
        ),
    ]
}

fn high_tier_allocation(budget: f64) -> Vec<BudgetItem> {
    allocation(
        budget,
        &[
            ("Paid Media", 45, "Paid social and search spend including creative production"),
            ("Influencer Marketing", 20, "Creator fees, seeding and usage rights"),
            ("Content & SEO", 15, "Editorial content and technical SEO"),
            ("Tools & Automation", 10, "Analytics, automation and attribution tooling"),
            ("Testing & Optimization", 10, "Experiments on new channels and audiences"),
        ],
    )
}

fn primary_segment(budget: f64) -> Segment {
    Segment {
        name: "Primary Target Audience".to_string(),
        size: if budget < 5000.0 {
            5000
        } else {
            share(budget, 20_000)
        },
        characteristics: vec![
            "Based on your customer description".to_string(),
            "Budget-conscious decision makers".to_string(),
            "Active on digital platforms".to_string(),
        ],
        reasoning: Some(
            "Sized according to your budget reach and typical market penetration rates".to_string(),
        ),
    }
}

fn roadmap_tips() -> Vec<String> {
    vec![
        "Week 1-2: Set up tracking (Google Analytics, Facebook Pixel) and create branded social media profiles".to_string(),
        "Week 3-4: Launch first campaign with 20% of budget to test audience response and optimize".to_string(),
        "Month 2: Double down on best-performing channels and creative formats based on data".to_string(),
        "Month 3: Scale successful campaigns while maintaining target cost-per-acquisition".to_string(),
    ]
}

fn growth_option(budget: f64) -> StrategyOption {
    let name = if budget < 3000.0 {
        "Organic Growth Focus"
    } else {
        "Balanced Growth Strategy"
    };
    StrategyOption {
        name: name.to_string(),
        description: "Prioritize sustainable growth within budget constraints using proven channels"
            .to_string(),
        pros: vec![
            "Cost-effective".to_string(),
            "Builds long-term assets".to_string(),
            "Lower risk".to_string(),
        ],
        cons: vec![
            "Slower initial results".to_string(),
            "Requires consistent effort".to_string(),
            "Limited reach without paid amplification".to_string(),
        ],
    }
}
