// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use ormboot::application::context::ApplicationContext;
use ormboot::config::settings::Settings;
use ormboot::infrastructure::database::entity_registry::EntityRegistry;
use ormboot::utils::telemetry;
use tracing::info;

/// 主函数
///
/// 加载配置、启动应用上下文并输出已注册的数据源
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting ormboot...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!(profile = %settings.profiles.active, "Configuration loaded");

    // 3. Build the context: datasource, then persistence factory
    let entities = EntityRegistry::new(settings.jpa.packages_to_scan.clone());
    let context = ApplicationContext::run(settings, entities).await?;

    println!("{}", context.data_source()?);

    Ok(())
}
