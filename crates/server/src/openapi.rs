use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct RegisterRequest { pub name: String, pub email: String, pub pswd: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub pswd: String }

#[derive(ToSchema)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: Option<String>,
    pub image: Option<String>,
}

#[derive(ToSchema)]
pub struct MsgResponse { pub msg: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::posts::list,
        crate::routes::posts::create,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            CreatePostRequest,
            MsgResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "posts"),
    )
)]
pub struct ApiDoc;
