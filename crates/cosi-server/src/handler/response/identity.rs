use cosi_provisioner::DriverInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfoResponse {
    pub name: String,
}

impl From<DriverInfo> for DriverInfoResponse {
    fn from(info: DriverInfo) -> Self {
        Self { name: info.name }
    }
}
