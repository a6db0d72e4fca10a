//! Data Sanitization
//!
//! Numerical stability utilities.
//!
//! Functions:
//! - NaN / Inf detection
//! - Probability clamping
//! - Probability range checks

/// 检查数组是否包含无效值 (NaN 或 Inf)
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// 判断数值是否为合法概率 (有限且位于 [0, 1])
pub fn is_probability(x: f64) -> bool {
    x.is_finite() && (0.0..=1.0).contains(&x)
}

/// 将数值截断到 [0, 1]，NaN 视为 0
pub fn clamp_probability(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
