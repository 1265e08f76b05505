//! 应用入口 - 编排层
//!
//! 1. 创建 `Dashboard`（日志由 main 初始化）
//! 2. 并发加载报名页需要的基础数据：区域、周期、招生批次
//! 3. 输出统计

use tracing::{error, info};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{Admission, Area, Cycle};
use crate::orchestrator::Dashboard;
use crate::utils::logging::{log_catalogs_loaded, log_startup};

/// 报名页的下拉框数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogs {
    pub areas: Vec<Area>,
    pub cycles: Vec<Cycle>,
    pub admissions: Vec<Admission>,
}

/// 应用主结构
pub struct App {
    dashboard: Dashboard,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);
        let dashboard = Dashboard::new(config)?;
        Ok(Self { dashboard })
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// 三个请求并发发出，任一失败即整体失败
    pub async fn load_catalogs(&self) -> AppResult<Catalogs> {
        let catalog = &self.dashboard.catalog;
        let (areas, cycles, admissions) =
            tokio::try_join!(catalog.areas(), catalog.cycles(), catalog.admissions())?;
        Ok(Catalogs {
            areas,
            cycles,
            admissions,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<Catalogs> {
        match self.load_catalogs().await {
            Ok(catalogs) => {
                log_catalogs_loaded(
                    catalogs.areas.len(),
                    catalogs.cycles.len(),
                    catalogs.admissions.len(),
                );
                info!("✅ 初始化完成");
                Ok(catalogs)
            }
            Err(e) => {
                error!("❌ 基础数据加载失败: {}", e);
                Err(e)
            }
        }
    }
}
