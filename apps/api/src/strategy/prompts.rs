// All LLM prompt constants for the Strategy module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for strategy generation.
pub const STRATEGY_SYSTEM: &str = "You are a seasoned marketing strategist with 15+ years of \
    experience planning campaigns for small businesses. \
    You MUST respond with a single valid JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Paragraph used when the user skipped the CSV upload.
pub const NO_CSV_CONTEXT: &str = "No CSV data provided - base recommendations on industry \
    standards and the business information above.";

/// CSV context paragraph. Replace: {total_rows}, {columns}, {insights}, {sample_json}
pub const CSV_CONTEXT_TEMPLATE: &str = r#"CSV DATA ANALYSIS:
- Total records analyzed: {total_rows}
- Available data columns: {columns}
- Key data insights: {insights}
- Sample records: {sample_json}

Use this data to build targeted segments and realistic projections."#;

/// Strategy prompt template.
/// Replace: {product}, {budget}, {customers}, {growth_goal}, {csv_context},
///          {low_max}, {high_min}, {benchmarks}, {realism_instruction}
pub const STRATEGY_PROMPT_TEMPLATE: &str = r#"Create a realistic marketing strategy for this business.

BUSINESS PROFILE:
- Product/Service: {product}
- Monthly Marketing Budget: ${budget}
- Target Customers: {customers}
- Growth Objective: {growth_goal}

{csv_context}

CAMPAIGN SIZING BY BUDGET TIER (4-6 campaigns):
- Budget under ${low_max}: organic channels first, plus low-cost paid promotion
- Budget ${low_max}-${high_min}: mix of paid social, Google Ads and email
- Budget ${high_min} and above: add influencer marketing and premium tooling
- Derive reach from ad spend using the benchmarks below, never from guesswork

BUDGET BREAKDOWN:
- Account for setup costs, monthly tool fees, creative production and management time
- Name specific tools with realistic prices (e.g. Canva Pro $15/month, Mailchimp $20-$300/month)
- Keep a 15-20% buffer for testing and optimization
- Allocation amounts must add up to the monthly budget and percentages to 100

AUDIENCE TARGETING:
- Build segments from the CSV data when it is available
- Size segments from addressable market and typical penetration, not wishful thinking

ROADMAP:
- Week-by-week actions for the first 12 weeks with KPIs to track

STRATEGIC OPTIONS:
- Compare growth-focused, brand-building and performance-driven approaches
- Expect results in 3-6 months; state pros and cons honestly for this budget

CHANNEL BENCHMARKS:
{benchmarks}

{realism_instruction}

Return ONLY a JSON object with this exact structure:
{
  "campaigns": [
    {
      "name": "Specific Campaign Name",
      "channel": "Email|Social Media|SEO|PPC|Content Marketing|Influencer Marketing",
      "budget": 1000,
      "timeline": "8 weeks",
      "expectedReach": 12000,
      "description": "2-3 sentence description",
      "costBreakdown": "Ad spend $X, Tools $Y, Creative $Z"
    }
  ],
  "budgetAllocation": [
    {
      "category": "Category Name",
      "amount": 1000,
      "percentage": 20,
      "explanation": "Justification with specific costs"
    }
  ],
  "targetSegments": [
    {
      "name": "Segment Name",
      "size": 5000,
      "characteristics": ["trait 1", "trait 2", "trait 3"],
      "reasoning": "Why this segment matters and what data supports it"
    }
  ],
  "actionableTips": [
    "Week 1-2: ...",
    "Week 3-4: ...",
    "Month 2: ...",
    "Month 3: ..."
  ],
  "strategyOptions": [
    {
      "name": "Approach Name",
      "description": "What this approach prioritizes and why",
      "pros": ["advantage 1", "advantage 2"],
      "cons": ["limitation 1", "limitation 2"]
    }
  ]
}"#;
