//! # 通用文本转换引擎 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     宿主 (GUI / IPC 层)                   │
//! │                                                          │
//! │   输入框 ── 方法选择 ── 配置面板 ── 快捷标签栏             │
//! │      │          │           │            │               │
//! └──────┼──────────┼───────────┼────────────┼───────────────┘
//!        ↕          ↕           ↕            ↕
//! ┌──────┼──────────┼───────────┼────────────┼───────────────┐
//! │      ↕        引擎 (本 crate)                             │
//! │                                                          │
//! │  ┌─ error ──────── ConvertError (统一错误类型)            │
//! │  │                                                       │
//! │  ├─ registry ───── 方法描述符表 (只读, 启动期构建)         │
//! │  │                                                       │
//! │  ├─ engine ─────── 校验流水线 + 单点分发                  │
//! │  │   ├─ encoding      Base 家族 / URL / Morse / ROT      │
//! │  │   ├─ encryption    AES / ChaCha20 / XOR / RC4         │
//! │  │   ├─ escape        字面量 / Unicode / 正则转义         │
//! │  │   ├─ formatting    JSON↔YAML / 进制 / 时间戳           │
//! │  │   └─ hashing       摘要 + "All" 扇出                   │
//! │  │                                                       │
//! │  ├─ sniffer ────── Base64 图片嗅探 (infer + image)        │
//! │  ├─ scheduler ──── 防抖自动执行 (代数计数器)              │
//! │  ├─ config_store ─ 按 (分类, 方法) 持久化配置             │
//! │  ├─ tags ───────── 快捷标签 (默认播种 + 增删)             │
//! │  ├─ state ──────── 选择状态门面 (EngineState)             │
//! │  └─ storage ────── KvStore 接缝 (JSON 文件 / 内存)        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `ConvertError`，所有操作的失败通道 |
//! | [`registry`] | (分类, 方法) → 能力元数据与分发标签的只读注册表 |
//! | [`engine`] | 转换执行器：固定顺序的校验流水线与方法分发 |
//! | [`sniffer`] | 判定文本输出是否为 Base64 编码的图片 |
//! | [`scheduler`] | 输入变化的防抖调度与手动触发 |
//! | [`config_store`] | 每个方法独立的密钥/IV/自动执行配置 |
//! | [`tags`] | 快捷标签的播种、增删与持久化 |
//! | [`state`] | 跨会话的 (分类, 方法, 子模式) 选择与引擎门面 |
//! | [`storage`] | local-storage 式键值持久化的 trait 接缝 |

pub mod error;
pub mod registry;
pub mod engine;
pub mod sniffer;
pub mod scheduler;
pub mod config_store;
pub mod tags;
pub mod state;
pub mod storage;

pub use config_store::{ConfigPatch, ConfigStore, MethodConfig};
pub use engine::{ConversionOutput, ConversionRequest, ConversionResult, Mode, execute};
pub use error::ConvertError;
pub use registry::{Category, Directionality, MethodDescriptor, Registry, registry};
pub use scheduler::AutoRunScheduler;
pub use state::{EngineState, Selection};
pub use storage::{JsonFileStore, KvStore, MemoryStore};
pub use tags::{QuickTag, TagManager};
