//! User profile types
//!
//! User profile returned by the backend on login and persisted alongside the
//! session tokens. Field names on the wire follow the backend contract
//! (`nome`, `perfil`, `permissoes`).

use serde::{Deserialize, Serialize};

use crate::constants::HOME_ROUTE;
use crate::impl_domain_str_conversions;

/// Role assigned to a platform user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrador,
    Gerente,
    Funcionario,
    /// Any role this client does not know about yet
    #[serde(other)]
    Other,
}

impl_domain_str_conversions!(Role {
    Administrador => "administrador",
    Gerente => "gerente",
    Funcionario => "funcionario",
    Other => "other",
});

impl Role {
    /// Human readable role name, as shown on access-denied screens.
    ///
    /// Unknown roles fall back to the least privileged label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Administrador => "Administrador",
            Self::Gerente => "Gerente",
            Self::Funcionario | Self::Other => "Funcionário",
        }
    }
}

/// Route → permissions table. An empty slice means any signed-in user may
/// access the route; routes missing from the table are denied.
const ROUTE_PERMISSIONS: &[(&str, &[&str])] = &[
    (HOME_ROUTE, &[]),
    ("/vendas/nova", &["vendas"]),
    ("/vendas/historico", &["vendas"]),
    ("/produtos/novo", &["produtos"]),
    ("/produtos/categorias", &["produtos"]),
    ("/clientes/novo", &["clientes"]),
    ("/clientes", &["clientes"]),
    ("/estoque", &["estoque"]),
    ("/usuarios", &["usuarios"]),
    ("/backup", &["backup"]),
    ("/relatorios", &["relatorios"]),
    ("/financeiro", &["relatorios"]),
    ("/security", &["seguranca"]),
    ("/ia/previsao", &["ia/previsao"]),
    ("/ia/chat", &["relatorios"]),
    ("/auditoria", &["auditoria"]),
];

const AUDIT_ROUTE: &str = "/auditoria";

/// Signed-in user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "perfil", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "permissoes", default)]
    pub permissions: Vec<String>,
}

impl UserProfile {
    /// Whether the user holds the given permission string.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Whether the user may open the given application route.
    ///
    /// The audit route is additionally open to administrators and managers
    /// even without the explicit `auditoria` permission.
    #[must_use]
    pub fn can_access(&self, route: &str) -> bool {
        let Some((_, required)) = ROUTE_PERMISSIONS.iter().find(|(r, _)| *r == route) else {
            return false;
        };

        if required.is_empty() {
            return true;
        }

        if route == AUDIT_ROUTE {
            return self.has_permission("auditoria") || self.is_admin() || self.is_manager();
        }

        required.iter().any(|permission| self.has_permission(permission))
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Administrador)
    }

    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.role == Some(Role::Gerente)
    }

    #[must_use]
    pub fn is_employee(&self) -> bool {
        self.role == Some(Role::Funcionario)
    }

    /// Display name of the user's role; users without a role are shown as
    /// employees.
    #[must_use]
    pub fn role_display_name(&self) -> &'static str {
        self.role.unwrap_or(Role::Other).display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Option<Role>, permissions: &[&str]) -> UserProfile {
        UserProfile {
            id: Some(7),
            name: "Maria".to_string(),
            email: "maria@padaria.com".to_string(),
            role,
            permissions: permissions.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    #[test]
    fn deserializes_backend_payload() {
        let json = r#"{
            "id": 1,
            "nome": "Admin",
            "email": "admin@synvia.io",
            "perfil": "administrador",
            "permissoes": ["vendas", "produtos", "ia/previsao"]
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "Admin");
        assert_eq!(profile.role, Some(Role::Administrador));
        assert!(profile.has_permission("ia/previsao"));
    }

    #[test]
    fn unknown_role_and_null_role_are_tolerated() {
        let unknown: UserProfile =
            serde_json::from_str(r#"{"nome":"X","email":"x@y","perfil":"estagiario"}"#).unwrap();
        assert_eq!(unknown.role, Some(Role::Other));
        assert!(unknown.permissions.is_empty());

        let null: UserProfile =
            serde_json::from_str(r#"{"nome":"X","email":"x@y","perfil":null}"#).unwrap();
        assert_eq!(null.role, None);
        assert_eq!(null.role_display_name(), "Funcionário");
    }

    #[test]
    fn home_route_is_open_and_unknown_routes_are_denied() {
        let profile = user(Some(Role::Funcionario), &[]);
        assert!(profile.can_access("/"));
        assert!(!profile.can_access("/nao-existe"));
    }

    #[test]
    fn routes_require_any_listed_permission() {
        let cashier = user(Some(Role::Funcionario), &["vendas", "clientes"]);
        assert!(cashier.can_access("/vendas/nova"));
        assert!(cashier.can_access("/clientes"));
        assert!(!cashier.can_access("/estoque"));
        assert!(!cashier.can_access("/financeiro"));

        let analyst = user(Some(Role::Gerente), &["relatorios"]);
        assert!(analyst.can_access("/financeiro"));
        assert!(analyst.can_access("/ia/chat"));
        assert!(!analyst.can_access("/ia/previsao"));
    }

    #[test]
    fn audit_route_open_to_admin_and_manager() {
        assert!(user(Some(Role::Administrador), &[]).can_access("/auditoria"));
        assert!(user(Some(Role::Gerente), &[]).can_access("/auditoria"));
        assert!(!user(Some(Role::Funcionario), &[]).can_access("/auditoria"));
        assert!(user(Some(Role::Funcionario), &["auditoria"]).can_access("/auditoria"));
    }

    #[test]
    fn role_predicates() {
        let admin = user(Some(Role::Administrador), &[]);
        assert!(admin.is_admin());
        assert!(!admin.is_manager());
        assert_eq!(admin.role_display_name(), "Administrador");

        let employee = user(Some(Role::Funcionario), &[]);
        assert!(employee.is_employee());
        assert_eq!("GERENTE".parse::<Role>().unwrap(), Role::Gerente);
    }
}
