// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::helpers::{settings_with, test_entities};
    use ormboot::application::context::{
        ApplicationContext, DATA_SOURCE_BEAN, ENTITY_MANAGER_FACTORY_BEAN,
    };
    use ormboot::config::settings::DataSourceSettings;
    use ormboot::infrastructure::database::data_source::{
        DataSource, PASSWORD_KEY, POSTGRES_DRIVER, URL_KEY, USERNAME_KEY,
    };
    use ormboot::utils::errors::BootstrapError;
    use std::sync::Arc;

    const TEST_URL: &str = "jdbc:postgresql://localhost:5432/test";

    #[test]
    fn test_data_source_fields_match_configuration() {
        let triples = [
            (TEST_URL, "u", "p"),
            ("jdbc:postgresql://db.example.com:6543/orders", "orders_rw", "pa:ss@word"),
            ("postgres://10.0.0.5/analytics", "reader", ""),
        ];

        for (url, username, password) in triples {
            let context = ApplicationContext::new(settings_with(
                Some(url),
                Some(username),
                Some(password),
            ));
            let ds = context.data_source().unwrap();

            assert_eq!(ds.url(), Some(url));
            assert_eq!(ds.username(), Some(username));
            assert_eq!(ds.password(), Some(password));
            assert_eq!(ds.driver_class_name(), POSTGRES_DRIVER);
        }
    }

    #[test]
    fn test_entity_manager_factory_is_singleton() {
        let context = ApplicationContext::new(settings_with(Some(TEST_URL), Some("u"), Some("p")));

        let first = context.entity_manager_factory().unwrap();
        let second = context.entity_manager_factory().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        // The factory wraps the registered datasource, not a second copy
        assert!(Arc::ptr_eq(first.data_source(), &context.data_source().unwrap()));
        assert_eq!(context.beans().len(), 2);
    }

    #[test]
    fn test_refresh_registers_exactly_one_of_each() {
        let context = ApplicationContext::with_entities(
            settings_with(Some(TEST_URL), Some("u"), Some("p")),
            test_entities(),
        );

        context.refresh().unwrap();
        context.refresh().unwrap();

        assert_eq!(
            context.beans().names(),
            vec![DATA_SOURCE_BEAN, ENTITY_MANAGER_FACTORY_BEAN]
        );
        let printed = context.data_source().unwrap().to_string();
        assert!(printed.contains(TEST_URL));
        assert!(printed.contains("username=u"));
        assert!(!printed.contains("password"));
    }

    #[test]
    fn test_pre_registered_data_source_is_kept() {
        let context = ApplicationContext::new(settings_with(Some(TEST_URL), Some("u"), Some("p")));
        let custom = DataSource::from_settings(&DataSourceSettings {
            url: Some("jdbc:postgresql://custom:5432/other".to_string()),
            username: Some("custom".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        });

        let registered = context.register_data_source(custom).unwrap();
        let factory = context.entity_manager_factory().unwrap();

        assert_eq!(registered.url(), Some("jdbc:postgresql://custom:5432/other"));
        assert!(Arc::ptr_eq(factory.data_source(), &registered));

        // A second registration does not replace the first
        let again = context
            .register_data_source(DataSource::from_settings(&DataSourceSettings::default()))
            .unwrap();
        assert!(Arc::ptr_eq(&again, &registered));
    }

    #[test]
    fn test_missing_keys_do_not_fail_construction() {
        let cases = [
            (None, Some("u"), Some("p"), URL_KEY),
            (Some(TEST_URL), None, Some("p"), USERNAME_KEY),
            (Some(TEST_URL), Some("u"), None, PASSWORD_KEY),
        ];

        for (url, username, password, missing) in cases {
            let context = ApplicationContext::new(settings_with(url, username, password));

            context.refresh().expect("construction tolerates missing keys");
            let ds = context.data_source().unwrap();
            match ds.connection_url() {
                Err(BootstrapError::MissingProperty(key)) => assert_eq!(key, missing),
                other => panic!("expected missing {missing}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_missing_key_fails_at_connection_open() {
        let context = ApplicationContext::new(settings_with(Some(TEST_URL), None, Some("p")));

        let err = context.start().await.unwrap_err();

        assert!(err.is_connection_error());
        assert!(matches!(err, BootstrapError::MissingProperty(USERNAME_KEY)));
        // Beans were still registered before the connection attempt
        assert_eq!(context.beans().len(), 2);
        assert!(context.connection().is_none());
    }
}
