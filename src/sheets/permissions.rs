// src/sheets/permissions.rs
//! Who may change what.
//!
//! Cell-level rights and structural rights are resolved independently:
//! structure (sheets, columns, rows, labels) is admin-only under every model,
//! so a user who can edit values can never reshape the schema.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use super::definitions::Sheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PermissionModel {
    /// `is_admin || (!read_only && sheet.is_editable)`
    #[default]
    RoleBased,
    /// `is_admin || (!read_only && actor == granted && level == Edit)`
    IdentityBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionLevel {
    #[default]
    View,
    Edit,
}

impl PermissionLevel {
    /// Only the exact host string `"Edit"` (ignoring surrounding whitespace) grants editing.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("Edit") => PermissionLevel::Edit,
            _ => PermissionLevel::View,
        }
    }
}

/// Host-provided identity and permission scalars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Resource)]
pub struct PermissionContext {
    pub is_admin: bool,
    pub workbook_read_only: bool,
    pub current_actor_id: Option<String>,
    pub granted_actor_id: Option<String>,
    pub permission_level: PermissionLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetPermissions {
    pub can_edit_cells: bool,
    pub can_edit_structure: bool,
}

fn actor_matches(current: Option<&str>, granted: Option<&str>) -> bool {
    match (current.map(str::trim), granted.map(str::trim)) {
        (Some(a), Some(b)) => !a.is_empty() && a == b,
        _ => false,
    }
}

/// Whether cell values of `sheet` may be edited. `sheet` only matters for the role model.
pub fn can_edit_cells(model: PermissionModel, ctx: &PermissionContext, sheet: Option<&Sheet>) -> bool {
    if ctx.is_admin {
        return true;
    }
    if ctx.workbook_read_only {
        return false;
    }
    match model {
        PermissionModel::RoleBased => sheet.is_some_and(|s| s.is_editable),
        PermissionModel::IdentityBased => {
            ctx.permission_level == PermissionLevel::Edit
                && actor_matches(
                    ctx.current_actor_id.as_deref(),
                    ctx.granted_actor_id.as_deref(),
                )
        }
    }
}

pub fn can_edit_structure(ctx: &PermissionContext) -> bool {
    ctx.is_admin
}

/// Cell rights narrowed to one column: non-admins cannot write read-only columns.
pub fn can_edit_column(model: PermissionModel, ctx: &PermissionContext, sheet: &Sheet, column: usize) -> bool {
    if ctx.is_admin {
        return true;
    }
    can_edit_cells(model, ctx, Some(sheet)) && !sheet.column_read_only(column)
}

pub fn resolve_permissions(model: PermissionModel, ctx: &PermissionContext, sheet: Option<&Sheet>) -> SheetPermissions {
    SheetPermissions {
        can_edit_cells: can_edit_cells(model, ctx, sheet),
        can_edit_structure: can_edit_structure(ctx),
    }
}
