use crate::api::approval::{CreateApprovalReq, DecideApprovalReq};
use crate::api::attendance::LogAttendanceReq;
use crate::api::board::{CreateCommentReq, CreatePostReq};
use crate::api::chat::{SendChatReq, StartRoomReq};
use crate::api::leave::{CreateLeaveReq, DecideLeaveReq};
use crate::api::message::SendMessageReq;
use crate::api::notify::AckReq;
use crate::api::users::SetPassword;
use crate::model::approval::{Approval, ApprovalStatus};
use crate::model::attendance::{AttendanceLog, AttendanceType};
use crate::model::chat::{ChatMessage, ChatRoom};
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::message::Message;
use crate::model::post::{Comment, Post, PostType};
use crate::model::role::Role;
use crate::api::schedule::CreateScheduleReq;
use crate::model::schedule::{Schedule, ScheduleType};
use crate::model::user::{User, UserStatus};
use crate::models::LoginReqDto;
use crate::service::approval::ApprovalView;
use crate::service::attendance::TodayAttendance;
use crate::service::leave::{MonthUsage, UpdateLeave, UserLeaveSummary};
use crate::service::notify::{Category, TickResult};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Groupware API",
        version = "1.0.0",
        description = r#"
## Corporate Groupware Backend

Directory, leave ledger, approval workflow, board, messaging, schedules,
attendance and chat for a small company, with poll-based notifications
and heartbeat presence.

### Security
All endpoints below `/api/v1` require **JWT Bearer authentication**.
Log in at `/auth/login` to obtain a token pair.
"#,
    ),
    modifiers(&SecurityAddon),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::users::list_users,
        crate::api::users::create_user,
        crate::api::users::delete_user,
        crate::api::users::set_password,
        crate::api::users::bulk_set_password,

        crate::api::leave::list_requests,
        crate::api::leave::create_request,
        crate::api::leave::set_status,
        crate::api::leave::edit_request,
        crate::api::leave::running_balances,
        crate::api::leave::leave_summary,

        crate::api::approval::list,
        crate::api::approval::create,
        crate::api::approval::submit,
        crate::api::approval::set_status,

        crate::api::board::list_posts,
        crate::api::board::create_post,
        crate::api::board::add_comment,
        crate::api::board::like_post,

        crate::api::message::list,
        crate::api::message::send,
        crate::api::message::mark_read,
        crate::api::message::delete,

        crate::api::schedule::list,
        crate::api::schedule::create,
        crate::api::schedule::delete,

        crate::api::attendance::log,
        crate::api::attendance::today,

        crate::api::chat::rooms,
        crate::api::chat::start,
        crate::api::chat::messages,
        crate::api::chat::send,

        crate::api::notify::tick,
        crate::api::notify::acknowledge,
        crate::api::notify::poll_config,
        crate::api::notify::heartbeat,
        crate::api::notify::presence
    ),
    components(
        schemas(
            LoginReqDto,
            User,
            UserStatus,
            Role,
            SetPassword,
            LeaveRequest,
            LeaveType,
            LeaveStatus,
            CreateLeaveReq,
            DecideLeaveReq,
            UpdateLeave,
            MonthUsage,
            UserLeaveSummary,
            Approval,
            ApprovalStatus,
            ApprovalView,
            CreateApprovalReq,
            DecideApprovalReq,
            Post,
            PostType,
            Comment,
            CreatePostReq,
            CreateCommentReq,
            Message,
            SendMessageReq,
            Schedule,
            ScheduleType,
            CreateScheduleReq,
            AttendanceLog,
            AttendanceType,
            LogAttendanceReq,
            TodayAttendance,
            ChatRoom,
            ChatMessage,
            StartRoomReq,
            SendChatReq,
            TickResult,
            Category,
            AckReq
        )
    ),
    tags(
        (name = "Auth", description = "Login, token refresh and logout"),
        (name = "Users", description = "Directory management APIs"),
        (name = "Leave", description = "Leave ledger APIs"),
        (name = "Approvals", description = "Approval workflow APIs"),
        (name = "Board", description = "Posts and notices"),
        (name = "Messages", description = "Direct messages"),
        (name = "Schedules", description = "Calendar APIs"),
        (name = "Attendance", description = "Clock-in / clock-out APIs"),
        (name = "Chat", description = "Chat rooms"),
        (name = "Notify", description = "Polling notifications and presence"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
