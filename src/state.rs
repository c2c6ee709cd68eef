use axum::extract::FromRef;

use crate::auth::service::AuthService;
use crate::conversation::repository::ConversationRepository;
use crate::conversation::service::ConversationService;
use crate::event::service::EventService;
use crate::integration::{self, Config};
use crate::message::repository::MessageRepository;
use crate::message::service::MessageService;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub auth_service: AuthService,
    pub conversation_service: ConversationService,
    pub message_service: MessageService,
    pub event_service: EventService,
}

impl AppState {
    pub async fn init(config: &Config) -> Self {
        let database = integration::db::init(&config.mongo);

        let pubsub = match &config.pubsub {
            Some(cfg) => Some(cfg.connect().await),
            None => None,
        };
        let event_service = EventService::new(pubsub);

        let conversation_service = ConversationService::new(
            ConversationRepository::new(&database),
            MessageRepository::new(&database),
            event_service.clone(),
        );
        let message_service = MessageService::new(
            MessageRepository::new(&database),
            conversation_service.clone(),
        );

        Self {
            auth_service: AuthService::new(&config.idp),
            conversation_service,
            message_service,
            event_service,
        }
    }
}
