// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::helpers::{test_entities, widget};
    use ormboot::infrastructure::database::entity_registry::EntityRegistry;
    use sea_orm::DbBackend;

    #[test]
    fn test_registration_order_is_preserved() {
        let registry = test_entities();

        assert_eq!(registry.namespace(), "ormboot::tests");
        assert_eq!(registry.tables(), vec!["widgets", "gadgets"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let registry = EntityRegistry::new("dup")
            .register::<widget::Entity>()
            .register::<widget::Entity>();

        assert_eq!(registry.tables(), vec!["widgets"]);
    }

    #[test]
    fn test_statements_target_registered_table() {
        let registry = EntityRegistry::new("sql").register::<widget::Entity>();
        let widget = &registry.entities()[0];

        let create = widget.create_table(DbBackend::Postgres).to_string();
        let drop = widget.drop_table(DbBackend::Postgres).to_string();
        let check = widget.check_table(DbBackend::Postgres).to_string();

        assert!(create.starts_with("CREATE TABLE"));
        assert!(create.contains("\"widgets\""));
        assert_eq!(drop, "DROP TABLE IF EXISTS \"widgets\"");
        assert!(check.contains("FROM \"widgets\""));
    }
}
