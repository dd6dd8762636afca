// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use ormboot::utils::errors::BootstrapError;
    use ormboot::utils::telemetry;

    #[test]
    fn test_telemetry_initialization_is_repeatable() {
        telemetry::init_telemetry();
        // A second call must not panic on the already-set global subscriber
        telemetry::init_telemetry();

        tracing::info!(
            url = "jdbc:postgresql://localhost:5432/test",
            driver = "org.postgresql.Driver",
            "Datasource configured"
        );

        let err = BootstrapError::MissingProperty("spring.datasource.url");
        tracing::error!(error = %err, "Startup failed");
    }

    #[test]
    fn test_error_messages_name_the_problem() {
        assert_eq!(
            BootstrapError::MissingProperty("spring.datasource.password").to_string(),
            "Missing required property: spring.datasource.password"
        );
        assert_eq!(
            BootstrapError::SchemaValidation {
                table: "widgets".to_string()
            }
            .to_string(),
            "Schema validation failed: table 'widgets' is not accessible"
        );
        assert!(!BootstrapError::Placeholder {
            key: "x".to_string()
        }
        .is_connection_error());
    }
}
