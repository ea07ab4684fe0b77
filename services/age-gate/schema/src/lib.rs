pub mod age_access_overrides;
pub mod age_verifications;
pub mod feature_access_rules;
pub mod persona_behaviors;
