pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const PACKAGE: &str = "📦";
    pub const PERSON: &str = "👤";
    pub const DEL: &str = "🗑️";
    pub const RIGHT: &str = "➡️";
}
