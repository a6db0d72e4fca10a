//! # mastery-engine - 技能掌握度估计核心库
//!
//! 本 crate 提供纯 Rust 实现的知识追踪算法:
//!
//! - **Bayesian Knowledge Tracing** - 单技能贝叶斯后验更新与学习转移
//! - **Conjunctive Blame** - 多技能题目的错误归因 (按未掌握程度分配责任)
//! - **Evidence Weighting** - 基于提示等级与答题时长的证据质量加权
//! - **History Replay** - 按时间顺序折叠完整答题历史
//! - **Confidence** - 置信度与不确定区间
//! - **Classification** - 掌握分类与自适应难度系数
//!
//! ## 设计理念
//!
//! - **纯计算** - 无 I/O、无全局状态，每次调用都从完整历史重新计算
//! - **注入配置** - 先验表与参数通过值传入，不依赖进程级单例
//! - **数值安全** - 所有概率在每个边界处截断到 [0, 1]
//! - **可并行** - 不同学习者之间完全独立，批量计算使用 rayon
//!
//! ## 模块结构
//!
//! - [`bkt`] - 核心贝叶斯更新 (观测更新、学习转移)
//! - [`conjunctive`] - 多技能联合更新 (责任分配)
//! - [`evidence`] - 证据质量权重 (提示等级、答题时长)
//! - [`replay`] - 历史回放 (稳定排序、逐条折叠)
//! - [`confidence`] - 置信度与不确定区间
//! - [`classify`] - 掌握分类、难度系数、会话模式选择
//! - [`engine`] - 计算入口 (单个学习者 / 批量)
//! - [`priors`] - 技能先验表 (前缀匹配)
//! - [`config`] - 可调参数
//! - [`sanitize`] - 数值清洗
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use mastery_engine::{
//!     Attempt, ComputeOptions, EngineConfig, MasteryEngine, SkillParams, SkillPriorTable,
//! };
//!
//! let priors = SkillPriorTable::new(Some(SkillParams::new(0.3, 0.1, 0.1, 0.2)))
//!     .and_then(|table| table.with_prefix("basic.", SkillParams::new(0.5, 0.2, 0.05, 0.1)))
//!     .expect("valid priors");
//! let engine = MasteryEngine::new(priors, EngineConfig::default()).expect("valid config");
//!
//! let history = vec![
//!     Attempt::new(1_000, vec!["basic.add".to_string()], true, 0, 4_000),
//!     Attempt::new(
//!         2_000,
//!         vec!["basic.add".to_string(), "carry.ten".to_string()],
//!         false,
//!         1,
//!         9_000,
//!     ),
//! ];
//! let report = engine
//!     .compute(&history, &ComputeOptions::default())
//!     .expect("priors cover all skills");
//! assert_eq!(report.skills.len(), 2);
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod bkt;
pub mod classify;
pub mod confidence;
pub mod config;
pub mod conjunctive;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod priors;
pub mod replay;
pub mod sanitize;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

/// 重新导出配置
pub use config::{
    BktConfig, BlameConfig, ClassificationConfig, ComplexityConfig, ConfidenceConfig,
    EngineConfig, EvidenceConfig,
};

/// 重新导出错误类型
pub use error::MasteryError;

/// 重新导出核心贝叶斯更新
pub use bkt::{apply_learning, bkt_update, bkt_update_checked, BktOutcome};

/// 重新导出多技能联合更新
pub use conjunctive::{blame_weights, distribute, SkillEvidence, SkillUpdate};

/// 重新导出证据权重
pub use evidence::{evidence_weight, help_level_weight, response_time_weight};

/// 重新导出先验表
pub use priors::SkillPriorTable;

/// 重新导出历史回放
pub use replay::{HistoryReplayer, ReplayOutcome};

/// 重新导出置信度估计
pub use confidence::{compute_confidence, success_rate, uncertainty_range};

/// 重新导出分类与难度映射
pub use classify::{
    classify, complexity_decision, resolve_multiplier, select_session_mode, ComplexityDecision,
    FluencyState, SessionMode,
};

/// 重新导出计算入口
pub use engine::MasteryEngine;
