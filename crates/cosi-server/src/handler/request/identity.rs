use serde::{Deserialize, Serialize};

/// Driver info request; carries no fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverInfoRequest {}
