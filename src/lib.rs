pub mod chat;
pub mod config;
pub mod data;
pub mod deck;
pub mod experts;
pub mod gesture;
pub mod model;
pub mod pages;
pub mod posts;
pub mod profile;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod swipe;

use config::{AppConfig, BackendConfig};
use data::{create_match, DataError, NewMatch};
use deck::Verdict;
use log::{info, warn};
use pages::community::CommunityPage;
use pages::dating::DatingPage;
use pages::experts::ExpertsPage;
use pages::messages::MessagesPage;
use pages::profile::ProfilePage;
use posts::{PostBoard, PostDraft};
use profile::{ProfileBook, ProfilePatch};
use storage::LocalStore;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Dating,
    Messages,
    Community,
    Experts,
    Profile,
}

impl Tab {
    const ALL: [Tab; 5] = [
        Tab::Dating,
        Tab::Messages,
        Tab::Community,
        Tab::Experts,
        Tab::Profile,
    ];

    fn label(self) -> &'static str {
        match self {
            Tab::Dating => "Dating",
            Tab::Messages => "Messages",
            Tab::Community => "Community",
            Tab::Experts => "Experts",
            Tab::Profile => "Profile",
        }
    }
}

/// A dismissible banner. Failed match writes carry the request so it can be
/// sent again.
#[derive(Debug, Clone, PartialEq)]
struct Notice {
    message: String,
    retry: Option<NewMatch>,
}

impl Notice {
    fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retry: None,
        }
    }

    fn match_failed(new_match: NewMatch, err: &DataError) -> Self {
        Self {
            message: format!("Couldn't save your choice: {err}"),
            retry: Some(new_match),
        }
    }

    fn retries(&self, new_match: &NewMatch) -> bool {
        self.retry.as_ref() == Some(new_match)
    }
}

fn record_match(
    backend: BackendConfig,
    new_match: NewMatch,
    notice: UseStateHandle<Option<Notice>>,
) {
    spawn_local(async move {
        match create_match(&backend, &new_match).await {
            Ok(recorded) => {
                info!("Recorded match {}", recorded.id);
                if (*notice).as_ref().map_or(false, |n| n.retries(&new_match)) {
                    notice.set(None);
                }
            }
            Err(err) => {
                warn!("Could not record match: {}", err);
                notice.set(Some(Notice::match_failed(new_match, &err)));
            }
        }
    });
}

#[function_component(App)]
fn app() -> Html {
    let config = use_memo(|_| AppConfig::from_build_env(), ());
    let tab = use_state(|| Tab::Dating);
    let board = use_state(|| PostBoard::load(LocalStore));
    let profile = use_state(|| ProfileBook::load(LocalStore));
    let notice = use_state(|| None::<Notice>);

    let on_decision = {
        let config = config.clone();
        let notice = notice.clone();
        Callback::from(move |(pet_id, verdict): (String, Verdict)| {
            let (Some(backend), Some(user_id)) =
                (config.backend.clone(), config.user_id.clone())
            else {
                return;
            };
            let new_match = NewMatch {
                user_id,
                pet_id,
                liked: verdict == Verdict::Liked,
            };
            record_match(backend, new_match, notice.clone());
        })
    };

    let retry_notice = {
        let config = config.clone();
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| {
            let (Some(backend), Some(new_match)) = (
                config.backend.clone(),
                (*notice).as_ref().and_then(|n| n.retry.clone()),
            ) else {
                return;
            };
            record_match(backend, new_match, notice.clone());
        })
    };

    let on_toggle_like = {
        let board = board.clone();
        Callback::from(move |id: String| {
            let mut next = (*board).clone();
            next.toggle_like(&id);
            board.set(next);
        })
    };

    let on_toggle_bookmark = {
        let board = board.clone();
        Callback::from(move |id: String| {
            let mut next = (*board).clone();
            next.toggle_bookmark(&id);
            board.set(next);
        })
    };

    let on_create_post = {
        let board = board.clone();
        let notice = notice.clone();
        Callback::from(move |draft: PostDraft| {
            let mut next = (*board).clone();
            match next.add_post(&draft) {
                Ok(_) => board.set(next),
                Err(err) => notice.set(Some(Notice::text(err.to_string()))),
            }
        })
    };

    let on_update_profile = {
        let profile = profile.clone();
        Callback::from(move |patch: ProfilePatch| {
            let mut next = (*profile).clone();
            next.update(patch);
            profile.set(next);
        })
    };

    let on_comment = {
        let board = board.clone();
        Callback::from(move |(id, text): (String, String)| {
            let mut next = (*board).clone();
            if next.add_comment(&id, &text).is_some() {
                board.set(next);
            }
        })
    };

    let dismiss_notice = {
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| notice.set(None))
    };

    let page = match *tab {
        Tab::Dating => html! {
            <DatingPage config={(*config).clone()} on_decision={on_decision} />
        },
        Tab::Messages => html! { <MessagesPage /> },
        Tab::Community => html! {
            <CommunityPage
                posts={board.posts()}
                on_toggle_like={on_toggle_like}
                on_toggle_bookmark={on_toggle_bookmark}
                on_create={on_create_post}
                comments={board.comment_threads()}
                on_comment={on_comment} />
        },
        Tab::Experts => html! { <ExpertsPage /> },
        Tab::Profile => html! {
            <ProfilePage profile={profile.profile().clone()} on_update={on_update_profile} />
        },
    };

    html! {
        <div class="app-container">
            {
                if let Some(current) = &*notice {
                    html! {
                        <div class="notice">
                            <span>{ &current.message }</span>
                            if current.retry.is_some() {
                                <button class="notice-retry" onclick={retry_notice}>{ "Retry" }</button>
                            }
                            <button class="notice-close" onclick={dismiss_notice}>{ "×" }</button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            <main class="page-container">{ page }</main>
            { render_navigation(*tab, &tab) }
        </div>
    }
}

fn render_navigation(active: Tab, tab: &UseStateHandle<Tab>) -> Html {
    html! {
        <nav class="bottom-nav">
            { for Tab::ALL.iter().map(|&item| {
                let tab = tab.clone();
                let onclick = Callback::from(move |_: MouseEvent| tab.set(item));
                let class = if item == active { "nav-item active" } else { "nav-item" };
                html! { <button class={class} onclick={onclick}>{ item.label() }</button> }
            }) }
        </nav>
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_match(pet_id: &str) -> NewMatch {
        NewMatch {
            user_id: "u1".to_string(),
            pet_id: pet_id.to_string(),
            liked: true,
        }
    }

    #[test]
    fn failed_match_notice_keeps_the_request_for_retry() {
        let err = DataError::Status {
            status: 503,
            context: "creating match".to_string(),
        };
        let notice = Notice::match_failed(new_match("7"), &err);

        assert_eq!(notice.retry, Some(new_match("7")));
        assert!(notice.retries(&new_match("7")));
        assert!(!notice.retries(&new_match("8")));
        assert!(notice.message.contains("HTTP 503"));
    }

    #[test]
    fn plain_notice_has_no_retry() {
        let notice = Notice::text("a title is required");
        assert_eq!(notice.retry, None);
        assert!(!notice.retries(&new_match("7")));
    }

    #[test]
    fn navigation_lists_every_tab() {
        let labels: Vec<&str> = Tab::ALL.iter().map(|tab| tab.label()).collect();
        assert_eq!(
            labels,
            vec!["Dating", "Messages", "Community", "Experts", "Profile"]
        );
    }
}
