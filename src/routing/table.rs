//! The static route table.

use crate::config::SecretName;
use crate::routing::spec::{
    BodyKind, HttpMethod, ParamSpec, ReplyKind, RouteSpec, SecretBinding, SecretPlacement,
    Upstream,
};

const ANY_METHOD: &[HttpMethod] = &HttpMethod::ALL;
const POST_ONLY: &[HttpMethod] = &[HttpMethod::Post];

/// Trello wants both identities on every call: the app key and a user token.
pub const TRELLO_CREDENTIALS: &[SecretBinding] = &[
    SecretBinding {
        secret: SecretName::TrelloKey,
        placement: SecretPlacement::Query("key"),
    },
    SecretBinding {
        secret: SecretName::TrelloToken,
        placement: SecretPlacement::Query("token"),
    },
];

const GEMINI_CREDENTIALS: &[SecretBinding] = &[SecretBinding {
    secret: SecretName::GeminiApiKey,
    placement: SecretPlacement::Header("x-goog-api-key"),
}];

const fn trello(
    action: &'static str,
    method: HttpMethod,
    path: &'static str,
    params: &'static [ParamSpec],
) -> RouteSpec {
    RouteSpec {
        action,
        upstream: Upstream::Trello,
        method,
        path,
        params,
        secrets: TRELLO_CREDENTIALS,
        body: BodyKind::None,
        reply: ReplyKind::Relay,
        accepts: ANY_METHOD,
    }
}

const BOARD_ID: &[ParamSpec] = &[ParamSpec::path("boardId")];
const LIST_ID: &[ParamSpec] = &[ParamSpec::path("listId")];
const CARD_ID: &[ParamSpec] = &[ParamSpec::path("cardId")];

const CREATE_BOARD: &[ParamSpec] = &[
    ParamSpec::query("name", "name"),
    ParamSpec::query("desc", "desc").optional(),
];

const CREATE_LIST: &[ParamSpec] = &[
    ParamSpec::query("boardId", "idBoard"),
    ParamSpec::query("name", "name"),
];

const CREATE_CARD: &[ParamSpec] = &[
    ParamSpec::query("listId", "idList"),
    ParamSpec::query("name", "name"),
    ParamSpec::query("desc", "desc").optional(),
];

const MOVE_CARD: &[ParamSpec] = &[
    ParamSpec::path("cardId"),
    ParamSpec::query("listId", "idList"),
];

const CHAT: &[ParamSpec] = &[
    ParamSpec::body("message"),
    ParamSpec::path("model").model_fallback(),
];

pub static ROUTES: &[RouteSpec] = &[
    trello("getBoards", HttpMethod::Get, "/members/me/boards", &[]),
    trello("getBoard", HttpMethod::Get, "/boards/{boardId}", BOARD_ID),
    trello("getLists", HttpMethod::Get, "/boards/{boardId}/lists", BOARD_ID),
    trello("getBoardCards", HttpMethod::Get, "/boards/{boardId}/cards", BOARD_ID),
    trello("getCards", HttpMethod::Get, "/lists/{listId}/cards", LIST_ID),
    trello("getCard", HttpMethod::Get, "/cards/{cardId}", CARD_ID),
    trello("createBoard", HttpMethod::Post, "/boards", CREATE_BOARD),
    trello("createList", HttpMethod::Post, "/lists", CREATE_LIST),
    trello("createCard", HttpMethod::Post, "/cards", CREATE_CARD),
    trello("moveCard", HttpMethod::Put, "/cards/{cardId}", MOVE_CARD),
    trello("deleteCard", HttpMethod::Delete, "/cards/{cardId}", CARD_ID),
    RouteSpec {
        action: "chat",
        upstream: Upstream::Gemini,
        method: HttpMethod::Post,
        path: "/v1beta/models/{model}:generateContent",
        params: CHAT,
        secrets: GEMINI_CREDENTIALS,
        body: BodyKind::GeminiChat,
        reply: ReplyKind::Chat,
        accepts: POST_ONLY,
    },
];
