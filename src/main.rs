use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use uuid::Uuid;

use boardshare::config::{Config, ConfigError};
use boardshare::prefs::{CameraPosition, CameraStorage, ColorPreferences};
use boardshare::query::{PgBackend, ProjectRole};
use boardshare::services::members;
use boardshare::services::share::{self, ShareAccessError, ShareView};
use boardshare::storage::FileStore;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("{0}")]
    Share(ShareAccessError),
    #[error("{action} failed")]
    Rejected { action: &'static str },
}

#[derive(Parser, Debug)]
#[command(name = "boardshare", about = "Board sharing, membership and preference cache CLI")]
struct Cli {
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "BOARDSHARE_STORAGE_PATH")]
    storage_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Share(ShareCommand),
    Members(MembersCommand),
    Colors(ColorsCommand),
    Camera(CameraCommand),
}

#[derive(Args, Debug)]
struct ShareCommand {
    #[command(subcommand)]
    command: ShareSubcommand,
}

#[derive(Subcommand, Debug)]
enum ShareSubcommand {
    /// Resolve a (URL-encoded) share token.
    Open {
        token: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Print the stored hash for a share password.
    HashPassword { password: String },
}

#[derive(Args, Debug)]
struct MembersCommand {
    #[command(subcommand)]
    command: MembersSubcommand,
}

#[derive(Subcommand, Debug)]
enum MembersSubcommand {
    List {
        project_id: Uuid,
    },
    Assignable {
        project_id: Uuid,
        #[arg(long)]
        current_user_id: Option<Uuid>,
        #[arg(long)]
        current_user_email: Option<String>,
    },
    Role {
        project_id: Uuid,
        user_id: Uuid,
    },
    Add {
        project_id: Uuid,
        user_id: Uuid,
        #[arg(long, value_parser = parse_role, default_value = "member")]
        role: ProjectRole,
    },
    Remove {
        project_id: Uuid,
        user_id: Uuid,
    },
    SetRole {
        project_id: Uuid,
        user_id: Uuid,
        #[arg(value_parser = parse_role)]
        role: ProjectRole,
    },
    Count {
        project_id: Uuid,
    },
    CanManage {
        project_id: Uuid,
        user_id: Uuid,
    },
    IsMember {
        project_id: Uuid,
        user_id: Uuid,
    },
    Invite {
        project_id: Uuid,
        email: String,
        #[arg(long)]
        invited_by: Uuid,
        #[arg(long, value_parser = parse_role, default_value = "member")]
        role: ProjectRole,
    },
}

#[derive(Args, Debug)]
struct ColorsCommand {
    #[command(subcommand)]
    command: ColorsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ColorsSubcommand {
    Save { element_type: String, color: String },
    Show {
        /// Only print the color for this element type.
        #[arg(long)]
        element_type: Option<String>,
    },
    Clear,
}

#[derive(Args, Debug)]
struct CameraCommand {
    #[command(subcommand)]
    command: CameraSubcommand,
}

#[derive(Subcommand, Debug)]
enum CameraSubcommand {
    Save {
        board_id: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true, default_value_t = 1.0)]
        scale: f64,
    },
    Get { board_id: String },
    Remove { board_id: String },
    Clear,
    List,
}

#[derive(Debug)]
struct CliContext {
    config: Config,
}

impl CliContext {
    async fn backend(&self) -> Result<PgBackend, CliError> {
        let url = self.config.require_database_url()?;
        let pool = boardshare::db::init_pool(url, self.config.db_max_connections).await?;
        Ok(PgBackend::new(pool))
    }

    fn store(&self) -> FileStore {
        FileStore::new(self.config.storage_path.clone())
    }
}

fn parse_role(raw: &str) -> Result<ProjectRole, String> {
    ProjectRole::parse(&raw.trim().to_lowercase())
        .ok_or_else(|| format!("unknown role `{raw}` (expected owner, admin or member)"))
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if cli.database_url.is_some() {
        config.database_url = cli.database_url;
    }
    if let Some(path) = cli.storage_path {
        config.storage_path = path;
    }
    let ctx = CliContext { config };

    match cli.command {
        Command::Share(cmd) => run_share(&ctx, cmd).await,
        Command::Members(cmd) => run_members(&ctx, cmd).await,
        Command::Colors(cmd) => run_colors(&ctx, cmd),
        Command::Camera(cmd) => run_camera(&ctx, cmd),
    }
}

// =============================================================================
// SHARE
// =============================================================================

async fn run_share(ctx: &CliContext, cmd: ShareCommand) -> Result<(), CliError> {
    match cmd.command {
        ShareSubcommand::Open { token, password } => {
            let db = match ctx.backend().await {
                Ok(db) => db,
                Err(e) => {
                    tracing::error!(error = %e, "cannot reach backend");
                    return Err(CliError::Share(ShareAccessError::Failed));
                }
            };
            match share::resolve_share(&db, &token, password.as_deref()).await {
                ShareView::Loaded(loaded) => print_json(&serde_json::to_value(loaded)?),
                ShareView::PasswordRequired { incorrect } => {
                    print_json(&json!({ "password_required": true, "incorrect": incorrect }))
                }
                ShareView::Error(e) => Err(CliError::Share(e)),
            }
        }
        ShareSubcommand::HashPassword { password } => {
            println!("{}", share::hash_share_password(&password));
            Ok(())
        }
    }
}

// =============================================================================
// MEMBERS
// =============================================================================

async fn run_members(ctx: &CliContext, cmd: MembersCommand) -> Result<(), CliError> {
    let db = ctx.backend().await?;
    match cmd.command {
        MembersSubcommand::List { project_id } => {
            let list = members::get_project_members(&db, project_id).await;
            print_json(&serde_json::to_value(list)?)
        }
        MembersSubcommand::Assignable { project_id, current_user_id, current_user_email } => {
            let list = members::get_project_members_for_assignment(
                &db,
                project_id,
                current_user_id,
                current_user_email.as_deref(),
            )
            .await;
            print_json(&serde_json::to_value(list)?)
        }
        MembersSubcommand::Role { project_id, user_id } => {
            let role = members::get_user_project_role(&db, project_id, user_id).await;
            print_json(&json!({ "role": role.map(ProjectRole::as_str) }))
        }
        MembersSubcommand::Add { project_id, user_id, role } => {
            let ok = members::add_project_member(&db, project_id, user_id, role).await;
            report(ok, "add member")
        }
        MembersSubcommand::Remove { project_id, user_id } => {
            let ok = members::remove_project_member(&db, project_id, user_id).await;
            report(ok, "remove member")
        }
        MembersSubcommand::SetRole { project_id, user_id, role } => {
            let ok = members::update_member_role(&db, project_id, user_id, role).await;
            report(ok, "update member role")
        }
        MembersSubcommand::Count { project_id } => {
            let count = members::get_project_member_count(&db, project_id).await;
            print_json(&json!({ "count": count }))
        }
        MembersSubcommand::CanManage { project_id, user_id } => {
            let allowed = members::can_manage_project_members(&db, project_id, user_id).await;
            print_json(&json!({ "can_manage": allowed }))
        }
        MembersSubcommand::IsMember { project_id, user_id } => {
            let member = members::is_project_member(&db, project_id, user_id).await;
            print_json(&json!({ "is_member": member }))
        }
        MembersSubcommand::Invite { project_id, email, invited_by, role } => {
            let ok = members::create_project_invitation(&db, &email, project_id, role, invited_by).await;
            report(ok, "create invitation")
        }
    }
}

// =============================================================================
// LOCAL PREFERENCES
// =============================================================================

fn run_colors(ctx: &CliContext, cmd: ColorsCommand) -> Result<(), CliError> {
    let prefs = ColorPreferences::new(ctx.store());
    match cmd.command {
        ColorsSubcommand::Save { element_type, color } => {
            prefs.save_last_used_color(&element_type, &color);
            print_json(&serde_json::to_value(prefs.get_last_used_colors())?)
        }
        ColorsSubcommand::Show { element_type: Some(element_type) } => {
            let color = prefs.get_last_used_color_for_element_type(&element_type);
            print_json(&json!({ "element_type": element_type, "color": color }))
        }
        ColorsSubcommand::Show { element_type: None } => {
            print_json(&serde_json::to_value(prefs.get_last_used_colors())?)
        }
        ColorsSubcommand::Clear => {
            prefs.clear_saved_colors();
            report(true, "clear colors")
        }
    }
}

fn run_camera(ctx: &CliContext, cmd: CameraCommand) -> Result<(), CliError> {
    let camera = CameraStorage::new(ctx.store());
    match cmd.command {
        CameraSubcommand::Save { board_id, x, y, scale } => {
            let position = CameraPosition { x, y, scale };
            camera.save(&board_id, position);
            report(position.is_usable(), "save camera")
        }
        CameraSubcommand::Get { board_id } => print_json(&serde_json::to_value(camera.get(&board_id))?),
        CameraSubcommand::Remove { board_id } => {
            camera.remove(&board_id);
            report(true, "remove camera")
        }
        CameraSubcommand::Clear => {
            camera.clear();
            report(true, "clear cameras")
        }
        CameraSubcommand::List => print_json(&serde_json::to_value(camera.all())?),
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn report(ok: bool, action: &'static str) -> Result<(), CliError> {
    if !ok {
        return Err(CliError::Rejected { action });
    }
    print_json(&json!({ "ok": true }))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
