//! Static sample assessments served by the canned strategy.

use serde::{Deserialize, Serialize};

use crate::models::assessment::Topic;

/// Quick-start presets, one per sample block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplePreset {
    Stats,
    Geometry,
    Algebra,
}

impl SamplePreset {
    pub const ALL: [SamplePreset; 3] = [
        SamplePreset::Stats,
        SamplePreset::Geometry,
        SamplePreset::Algebra,
    ];

    /// Topic → sample block. Topics without a dedicated block fall back to algebra.
    pub fn for_topic(topic: Topic) -> Self {
        match topic {
            Topic::Statistics | Topic::Probability => SamplePreset::Stats,
            Topic::Geometry => SamplePreset::Geometry,
            Topic::Algebra | Topic::Number | Topic::Functions => SamplePreset::Algebra,
        }
    }

    pub fn sample(self) -> &'static Sample {
        match self {
            SamplePreset::Stats => &STATS_SAMPLE,
            SamplePreset::Geometry => &GEOMETRY_SAMPLE,
            SamplePreset::Algebra => &ALGEBRA_SAMPLE,
        }
    }
}

#[derive(Debug)]
pub struct Sample {
    pub title: &'static str,
    pub content: &'static str,
}

static STATS_SAMPLE: Sample = Sample {
    title: "Sports Statistics Analysis",
    content: r#"**Title: Basketball Performance Analysis**

**Global Context:** Identities and Relationships (Sports and personal achievement)

**Task:** Analyze player statistics to determine the most valuable player for a tournament.

**Questions:**
1. Calculate mean, median, and mode for points scored by each player.
2. Create a comparative bar graph showing each player's performance.
3. Investigate which statistical measure best represents consistency. Justify your choice.
4. Propose a new way to calculate "player value" using multiple statistics.

**Mathematical Skills:**
- Measures of central tendency
- Data representation
- Comparative analysis
- Justification

**Materials Needed:** Calculator, graph paper"#,
};

static GEOMETRY_SAMPLE: Sample = Sample {
    title: "Playground Design Project",
    content: r#"**Title: Designing an Inclusive Playground**

**Global Context:** Fairness and Development

**Task:** Design a playground that is accessible to all children while maximizing space usage.

**Questions:**
1. Calculate the area of available land (composite shapes).
2. Design three different playground layouts using geometric shapes.
3. Investigate which design provides the best area-to-perimeter ratio.
4. Justify why your chosen design is most accessible.

**Mathematical Skills:**
- Area and perimeter calculations
- Geometric shape properties
- Optimization
- Spatial reasoning"#,
};

static ALGEBRA_SAMPLE: Sample = Sample {
    title: "Smartphone Pricing Strategy",
    content: r#"**Title: Mobile Plan Comparison**

**Global Context:** Globalization and Sustainability

**Task:** Compare different mobile phone plans to find the most cost-effective option.

**Questions:**
1. Write linear equations representing three different pricing plans.
2. Graph the equations to find break-even points.
3. Investigate which plan is best for light, medium, and heavy users.
4. Create your own optimal pricing model with justification.

**Mathematical Skills:**
- Linear equations
- Graphing
- Systems of equations
- Problem-solving"#,
};
