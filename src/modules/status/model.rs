use serde::Deserialize;

/// Load above this percentage is flagged on the dashboard.
pub const HOT_LOAD_PCT: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GpuStats {
    pub name: String,
    #[serde(rename = "load")]
    pub load_pct: f64,
    #[serde(rename = "memory")]
    pub memory_pct: f64,
}

impl Default for GpuStats {
    fn default() -> Self {
        Self {
            name: "None".to_string(),
            load_pct: 0.0,
            memory_pct: 0.0,
        }
    }
}

/// Read-only view of the rendering host, replaced wholesale on every
/// successful poll.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemSnapshot {
    pub device: String,
    pub gpu_available: bool,
    #[serde(rename = "cpu_usage")]
    pub cpu_usage_pct: f64,
    #[serde(rename = "memory_usage")]
    pub memory_usage_pct: f64,
    #[serde(rename = "gpu_stats", default)]
    pub gpu: GpuStats,
}

impl Default for SystemSnapshot {
    fn default() -> Self {
        Self {
            device: "Checking...".to_string(),
            gpu_available: false,
            cpu_usage_pct: 0.0,
            memory_usage_pct: 0.0,
            gpu: GpuStats::default(),
        }
    }
}

impl SystemSnapshot {
    pub fn cpu_hot(&self) -> bool {
        self.cpu_usage_pct > HOT_LOAD_PCT
    }

    pub fn gpu_hot(&self) -> bool {
        self.gpu.load_pct > HOT_LOAD_PCT
    }
}
