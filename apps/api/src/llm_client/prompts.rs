// Shared prompt fragments. Feature modules keep their own templates in a
// prompts.rs next to the code that uses them.

/// System persona for every assessment-writing call.
pub const MYP_TEACHER_SYSTEM: &str = "You are an expert IB MYP Mathematics teacher.";

/// Context substituted when the user leaves the real-world context blank.
pub const DEFAULT_CONTEXT: &str = "General application";
