// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::helpers::{isolated_loader, settings_with, sqlite_settings};
    use ormboot::application::context::ApplicationContext;
    use ormboot::config::settings::{PersistenceSettings, SchemaMode};
    use ormboot::infrastructure::database::data_source::PASSWORD_KEY;
    use ormboot::infrastructure::database::persistence::VendorAdapter;
    use ormboot::utils::errors::BootstrapError;
    use std::collections::BTreeMap;

    fn expected_properties() -> BTreeMap<String, String> {
        [
            ("hibernate.hbm2ddl.auto", "create"),
            ("hibernate.dialect", "org.hibernate.dialect.PostgreSQL9Dialect"),
            ("hibernate.show_sql", "true"),
            ("hibernate.jdbc.lob.non_contextual_creation", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_default_properties_are_constant() {
        assert_eq!(PersistenceSettings::default().additional_properties(), expected_properties());

        let loaded = isolated_loader().load().unwrap();
        assert_eq!(loaded.jpa.additional_properties(), expected_properties());
    }

    #[test]
    fn test_factory_carries_vendor_settings() {
        let context = ApplicationContext::new(settings_with(
            Some("jdbc:postgresql://localhost:5432/test"),
            Some("u"),
            Some("p"),
        ));

        let factory = context.entity_manager_factory().unwrap();

        assert_eq!(factory.properties(), &expected_properties());
        assert_eq!(factory.property("hibernate.hbm2ddl.auto"), Some("create"));
        assert_eq!(factory.property("hibernate.unknown"), None);
        assert_eq!(factory.vendor_adapter(), VendorAdapter::SeaOrm);
        assert_eq!(factory.packages_to_scan(), "ormboot::entities");
        assert_eq!(factory.schema_mode(), SchemaMode::Recreate);
        assert!(factory.entities().is_empty());
    }

    #[test]
    fn test_schema_mode_is_reflected_in_properties() {
        for (mode, expected) in [("recreate", "create"), ("validate", "validate"), ("none", "none")] {
            let settings = isolated_loader()
                .set("spring.jpa.schema_mode", mode)
                .load()
                .unwrap();

            let context = ApplicationContext::new(settings);
            let factory = context.entity_manager_factory().unwrap();
            assert_eq!(factory.property("hibernate.hbm2ddl.auto"), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_open_uses_data_source_connection_rules() {
        let context = ApplicationContext::new(settings_with(
            Some("jdbc:postgresql://localhost:5432/test"),
            Some("u"),
            None,
        ));
        let factory = context.entity_manager_factory().unwrap();

        let err = factory.open().await.unwrap_err();
        assert!(matches!(err, BootstrapError::MissingProperty(PASSWORD_KEY)));

        let context = ApplicationContext::new(sqlite_settings("sqlite::memory:", "none"));
        let factory = context.entity_manager_factory().unwrap();
        let db = factory.open().await.unwrap();
        db.ping().await.unwrap();
    }
}
