mod session;

use attend_core::{EmployeeId, TenantId, UserId};
use serde::{Deserialize, Serialize};

pub use session::{InMemorySessionStore, Session, SessionStore, SessionToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Manager,
    Employee,
}

impl Role {
    pub fn permissions(&self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Self::Owner | Self::Admin => &[
                ViewOffices,
                EditOffices,
                ViewEmployees,
                EditEmployees,
                ViewAttendance,
                RecordAttendance,
                ExportAttendance,
                ManageUsers,
            ],
            Self::Manager => &[
                ViewOffices,
                ViewEmployees,
                EditEmployees,
                ViewAttendance,
                RecordAttendance,
                ExportAttendance,
            ],
            Self::Employee => &[ViewOffices, RecordAttendance],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewOffices,
    EditOffices,
    ViewEmployees,
    EditEmployees,
    ViewAttendance,
    RecordAttendance,
    ExportAttendance,
    ManageUsers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub tenant_id: TenantId,
    pub user_id: UserId,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    pub roles: Vec<Role>,
}

impl Subject {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|candidate| *candidate == role)
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.roles
            .iter()
            .any(|role| role.permissions().contains(&permission))
    }

    /// Recording attendance for someone else needs more than the employee grant.
    pub fn can_act_for(&self, employee_id: EmployeeId) -> bool {
        if self.employee_id == Some(employee_id) {
            return true;
        }
        self.allows(Permission::EditEmployees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(roles: Vec<Role>) -> Subject {
        Subject {
            tenant_id: TenantId::new(),
            user_id: UserId::new(),
            employee_id: Some(EmployeeId::new()),
            roles,
        }
    }

    #[test]
    fn employee_role_is_limited() {
        let staff = subject(vec![Role::Employee]);
        assert!(staff.allows(Permission::RecordAttendance));
        assert!(!staff.allows(Permission::ViewAttendance));
        assert!(!staff.allows(Permission::EditOffices));
        assert!(staff.can_act_for(staff.employee_id.unwrap()));
        assert!(!staff.can_act_for(EmployeeId::new()));
    }

    #[test]
    fn roles_combine() {
        let mixed = subject(vec![Role::Employee, Role::Manager]);
        assert!(mixed.has_role(Role::Manager));
        assert!(mixed.allows(Permission::ExportAttendance));
        assert!(!mixed.allows(Permission::ManageUsers));
        assert!(mixed.can_act_for(EmployeeId::new()));
    }
}
