// Prompt template for remote assessment generation.
// The persona system prompt lives in llm_client::prompts.

/// Assessment prompt template.
/// Replace: {level}, {topic}, {criteria}, {difficulty}, {context}
pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"Create a complete MYP {level} Mathematics assessment with these specifications:

TOPIC: {topic}
CRITERIA: {criteria}
DIFFICULTY: {difficulty}
REAL-WORLD CONTEXT: {context}

Format your response as:

====== TITLE ======
[Creative title]

====== TASK ======
[Clear task description for students]

====== QUESTIONS ======
1. [Question 1 - Basic understanding]
2. [Question 2 - Application]
3. [Question 3 - Analysis/Justification]
4. [Question 4 - Extension]

====== SKILLS REQUIRED ======
• [Skill 1]
• [Skill 2]
• [Skill 3]

====== TEACHER NOTES ======
[Brief implementation notes]"#;

/// Sampling temperature for assessment generation.
pub const ASSESSMENT_TEMPERATURE: f32 = 0.7;

/// Token budget for assessment generation.
pub const ASSESSMENT_MAX_TOKENS: u32 = 1000;
