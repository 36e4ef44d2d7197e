use poise::serenity_prelude::{GuildId, Http, Permissions, RoleId};
use tracing::{error, info, warn};

/// A single permission with its status
#[derive(Debug, Clone)]
pub struct PermissionStatus {
    pub name: &'static str,
    pub description: &'static str,
    pub has_permission: bool,
}

/// All required permissions for the bot
pub fn get_required_permissions() -> Vec<(&'static str, &'static str, Permissions)> {
    vec![
        ("VIEW_CHANNEL", "See the channel with the verification button", Permissions::VIEW_CHANNEL),
        ("SEND_MESSAGES", "Post the verification button", Permissions::SEND_MESSAGES),
        ("MANAGE_ROLES", "Assign the role to verified members", Permissions::MANAGE_ROLES),
    ]
}

/// Result of a permission check for a single guild
#[derive(Debug)]
pub struct GuildPermissionCheck {
    pub guild_id: GuildId,
    pub guild_name: String,
    pub permission_statuses: Vec<PermissionStatus>,
    pub has_all_permissions: bool,
    pub bot_role_position: Option<u16>,
    pub bot_role_name: Option<String>,
    /// Name and position of the role handed out on verification, if it exists
    pub verified_role: Option<(String, u16)>,
    pub role_hierarchy_ok: bool,
}

/// Discord only lets a bot assign roles strictly below its highest role
pub fn can_assign_role(bot_role_position: Option<u16>, target_position: Option<u16>) -> bool {
    match (bot_role_position, target_position) {
        (Some(bot_pos), Some(target_pos)) => bot_pos > target_pos,
        _ => false,
    }
}

/// Check bot permissions and role hierarchy for a specific guild
pub async fn check_guild_permissions(
    http: &Http,
    guild_id: GuildId,
    verified_role_id: RoleId,
) -> Result<GuildPermissionCheck, String> {
    let guild = guild_id
        .to_partial_guild(http)
        .await
        .map_err(|e| format!("Failed to fetch guild {}: {}", guild_id, e))?;

    let bot_user = http
        .get_current_user()
        .await
        .map_err(|e| format!("Failed to get bot user: {}", e))?;

    let bot_member = guild
        .member(http, bot_user.id)
        .await
        .map_err(|e| format!("Failed to get bot member in guild {}: {}", guild_id, e))?;

    // Base permissions are enough for a server-wide check
    #[allow(deprecated)]
    let bot_permissions = guild.member_permissions(&bot_member);

    let mut permission_statuses = Vec::new();
    let mut has_all_permissions = true;
    for (name, description, permission) in get_required_permissions() {
        let has_permission = bot_permissions.contains(permission);
        if !has_permission {
            has_all_permissions = false;
        }
        permission_statuses.push(PermissionStatus {
            name,
            description,
            has_permission,
        });
    }

    let bot_highest = bot_member
        .roles
        .iter()
        .filter_map(|id| guild.roles.get(id))
        .max_by_key(|role| role.position);

    let verified_role = guild
        .roles
        .get(&verified_role_id)
        .map(|role| (role.name.clone(), role.position));

    let role_hierarchy_ok = can_assign_role(
        bot_highest.map(|r| r.position),
        verified_role.as_ref().map(|(_, pos)| *pos),
    );

    Ok(GuildPermissionCheck {
        guild_id,
        guild_name: guild.name.clone(),
        permission_statuses,
        has_all_permissions,
        bot_role_position: bot_highest.map(|r| r.position),
        bot_role_name: bot_highest.map(|r| r.name.clone()),
        verified_role,
        role_hierarchy_ok,
    })
}

/// Log permission check results with appropriate log levels
pub fn log_permission_check(check: &GuildPermissionCheck, verified_role_id: RoleId) {
    info!("Permission check for guild '{}' (ID: {})", check.guild_name, check.guild_id);

    match &check.bot_role_name {
        Some(name) => info!(
            "  Bot's highest role: '{}' (position {})",
            name,
            check.bot_role_position.unwrap_or(0)
        ),
        None => warn!("  Bot has no roles assigned!"),
    }

    for status in &check.permission_statuses {
        if status.has_permission {
            info!("  [YES] {:<14} - {}", status.name, status.description);
        } else {
            error!("  [NO]  {:<14} - {}", status.name, status.description);
        }
    }

    match &check.verified_role {
        None => error!(
            "  Verified role {} does not exist in this guild; verifications will not assign it",
            verified_role_id
        ),
        Some((name, pos)) if !check.role_hierarchy_ok => error!(
            "  Role '{}' (position {}) is not below the bot's highest role; move the bot role above it",
            name, pos
        ),
        Some((name, _)) => info!("  Role '{}' can be assigned", name),
    }
}

/// Check every guild the bot starts in and log the outcome
pub async fn run_startup_permission_check(
    http: &Http,
    guild_ids: &[GuildId],
    verified_role_id: RoleId,
) {
    for guild_id in guild_ids {
        match check_guild_permissions(http, *guild_id, verified_role_id).await {
            Ok(check) => log_permission_check(&check, verified_role_id),
            Err(e) => error!("Failed to check permissions for guild {}: {}", guild_id, e),
        }
    }
}
