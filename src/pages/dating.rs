use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::FetchStatus;
use crate::config::AppConfig;
use crate::data::get_pets;
use crate::deck::Verdict;
use crate::gesture::Point;
use crate::model::{sample_candidates, Candidate, Gender};
use crate::schedule::TimeoutScheduler;
use crate::session::{DeckListener, DeckSession, DeckView};

type BrowserDeck = DeckSession<TimeoutScheduler>;

#[derive(Properties, PartialEq)]
pub struct DatingProps {
    pub config: AppConfig,
    pub on_decision: Callback<(String, Verdict)>,
}

struct PageListener {
    redraw: UseForceUpdateHandle,
    detail: UseStateHandle<Option<String>>,
    on_decision: Callback<(String, Verdict)>,
}

impl DeckListener for PageListener {
    fn on_decision(&self, id: &str, verdict: Verdict) {
        self.on_decision.emit((id.to_string(), verdict));
        self.redraw.force_update();
    }

    fn on_detail_view(&self, id: &str) {
        self.detail.set(Some(id.to_string()));
    }

    fn on_change(&self) {
        self.redraw.force_update();
    }
}

#[function_component(DatingPage)]
pub fn dating_page(props: &DatingProps) -> Html {
    let status = use_state(|| FetchStatus::Loading);
    let detail = use_state(|| None::<String>);
    let deck = use_mut_ref(|| None::<Rc<BrowserDeck>>);
    let pointer = use_mut_ref(|| None::<i32>);
    let redraw = use_force_update();

    {
        let status = status.clone();
        let deck = deck.clone();
        let listener: Rc<dyn DeckListener> = Rc::new(PageListener {
            redraw: redraw.clone(),
            detail: detail.clone(),
            on_decision: props.on_decision.clone(),
        });
        let backend = props.config.backend.clone();

        use_effect_with_deps(
            move |_| {
                let slot = deck.clone();
                let install = move |candidates: Vec<Candidate>| {
                    let session = DeckSession::new(candidates, TimeoutScheduler, listener);
                    *slot.borrow_mut() = Some(Rc::new(session));
                };

                match backend {
                    None => {
                        install(sample_candidates());
                        status.set(FetchStatus::Idle);
                    }
                    Some(backend) => {
                        let status = status.clone();
                        spawn_local(async move {
                            match get_pets(&backend).await {
                                Ok(pets) => {
                                    install(pets.into_iter().map(|pet| pet.into_candidate()).collect());
                                    status.set(FetchStatus::Idle);
                                }
                                Err(err) => {
                                    warn!("Could not load pets: {}", err);
                                    status.set(FetchStatus::Error(err.to_string()));
                                }
                            }
                        });
                    }
                }

                move || {
                    if let Some(session) = deck.borrow().as_ref() {
                        session.detach();
                    }
                }
            },
            (),
        );
    }

    let session = deck.borrow().clone();
    let body = match (&*status, session) {
        (FetchStatus::Loading, _) => html! { <p class="placeholder">{ "Finding dogs nearby…" }</p> },
        (FetchStatus::Error(message), _) => html! { <p class="error">{ message }</p> },
        (FetchStatus::Idle, None) => html! {},
        (FetchStatus::Idle, Some(session)) => {
            render_deck(&session, &session.view(), &pointer, &redraw)
        }
    };

    let close_detail = {
        let detail = detail.clone();
        Callback::from(move |_: MouseEvent| detail.set(None))
    };
    let detail_candidate = (*detail).as_ref().and_then(|id| {
        deck.borrow()
            .as_ref()
            .and_then(|session| session.inspect(|stack| stack.find(id).cloned()))
    });

    html! {
        <div class="dating">
            <header class="page-header">
                <h1>{ "PetMeet" }</h1>
            </header>
            <div class="swipe-area">{ body }</div>
            { render_detail(detail_candidate.as_ref(), close_detail) }
        </div>
    }
}

fn render_deck(
    session: &Rc<BrowserDeck>,
    view: &DeckView,
    pointer: &Rc<RefCell<Option<i32>>>,
    redraw: &UseForceUpdateHandle,
) -> Html {
    if view.empty {
        return html! {
            <div class="deck-empty">
                <div class="deck-emoji">{ "🐾" }</div>
                <h3>{ "You've seen all dogs!" }</h3>
                <p>{ "Check back later for new furry friends in your area!" }</p>
            </div>
        };
    }

    let Some(candidate) = view.displayed.as_ref() else {
        let onclick = {
            let session = session.clone();
            let redraw = redraw.clone();
            Callback::from(move |_: MouseEvent| {
                session.restart();
                redraw.force_update();
            })
        };
        return html! {
            <div class="deck-empty">
                <div class="deck-emoji">{ "👋" }</div>
                <h3>{ "You've seen all pets!" }</h3>
                <p>{ "Check back later for new matches or adjust your preferences." }</p>
                <button class="btn-primary" onclick={onclick}>{ "Start over" }</button>
            </div>
        };
    };

    let pointer_down = {
        let session = session.clone();
        let pointer = pointer.clone();
        let redraw = redraw.clone();
        Callback::from(move |event: PointerEvent| {
            if pointer.borrow().is_some() {
                return;
            }
            if let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            {
                let _ = target.set_pointer_capture(event.pointer_id());
            }
            *pointer.borrow_mut() = Some(event.pointer_id());
            session.press(Point::new(event.client_x() as f64, event.client_y() as f64));
            redraw.force_update();
        })
    };

    let pointer_move = {
        let session = session.clone();
        let pointer = pointer.clone();
        let redraw = redraw.clone();
        Callback::from(move |event: PointerEvent| {
            if *pointer.borrow() == Some(event.pointer_id()) {
                event.prevent_default();
                session.drag(Point::new(event.client_x() as f64, event.client_y() as f64));
                redraw.force_update();
            }
        })
    };

    let pointer_end = {
        let session = session.clone();
        let pointer = pointer.clone();
        let redraw = redraw.clone();
        Callback::from(move |event: PointerEvent| {
            if *pointer.borrow() != Some(event.pointer_id()) {
                return;
            }
            release_capture(&event);
            *pointer.borrow_mut() = None;
            session.release();
            redraw.force_update();
        })
    };

    let pointer_cancel = {
        let session = session.clone();
        let pointer = pointer.clone();
        let redraw = redraw.clone();
        Callback::from(move |event: PointerEvent| {
            if *pointer.borrow() != Some(event.pointer_id()) {
                return;
            }
            release_capture(&event);
            *pointer.borrow_mut() = None;
            session.cancel_drag();
            redraw.force_update();
        })
    };

    let decide = |verdict: Verdict| {
        let session = session.clone();
        let id = candidate.id.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            // rejected decisions are logged by the session
            let _ = match verdict {
                Verdict::Liked => session.like(&id),
                Verdict::Disliked => session.dislike(&id),
            };
        })
    };
    let stop_pointer = Callback::from(|event: PointerEvent| event.stop_propagation());

    let exit_class = view.exiting.map(|direction| direction.css_class());
    let image = candidate.image(view.image_index).unwrap_or_default().to_string();
    let gender_mark = match candidate.gender {
        Some(Gender::Male) => "♂",
        Some(Gender::Female) => "♀",
        None => "",
    };

    html! {
        <div class={classes!("card-slot", exit_class)}>
            <div class="pet-card"
                style={view.pose.to_style(view.dragging)}
                onpointerdown={pointer_down}
                onpointermove={pointer_move}
                onpointerup={pointer_end}
                onpointercancel={pointer_cancel}>
                <div class="pet-photo">
                    <img src={image} alt={format!("{}'s photo {}", candidate.name, view.image_index + 1)} draggable="false" />
                    <div class="pagination">
                        { for (0..candidate.images.len()).map(|index| {
                            let class = if index == view.image_index { "dot active" } else { "dot" };
                            html! { <span class={class}></span> }
                        }) }
                    </div>
                    <div class="likes-badge">{ format!("♥ {}", candidate.likes_count) }</div>
                    <div class="detail-hint">{ "Swipe up for details" }</div>
                </div>
                <div class="pet-info">
                    <h2>{ &candidate.name }</h2>
                    <p class="pet-meta">
                        <span class="gender">{ gender_mark }</span>
                        <span>{ &candidate.breed }</span>
                        <span class="distance">{ format!("{} km", candidate.distance_km) }</span>
                    </p>
                    <div class="actions">
                        <button class="btn-circle dislike" onpointerdown={stop_pointer.clone()} onclick={decide(Verdict::Disliked)}>{ "✕" }</button>
                        <button class="btn-circle like" onpointerdown={stop_pointer} onclick={decide(Verdict::Liked)}>{ "♥" }</button>
                    </div>
                </div>
            </div>
        </div>
    }
}

fn release_capture(event: &PointerEvent) {
    if let Some(target) = event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
    {
        let _ = target.release_pointer_capture(event.pointer_id());
    }
}

fn render_detail(candidate: Option<&Candidate>, on_close: Callback<MouseEvent>) -> Html {
    let Some(pet) = candidate else {
        return html! { <div class="detail-sheet"></div> };
    };

    html! {
        <div class="detail-sheet open">
            <div class="detail-header">
                <button class="icon-button" onclick={on_close}>{ "⌄" }</button>
                <h2>{ format!("{}'s Profile", pet.name) }</h2>
            </div>
            <div class="detail-body">
                <div class="gallery">
                    { for pet.images.iter().enumerate().map(|(idx, src)| html! {
                        <img src={src.clone()} alt={format!("{} photo {}", pet.name, idx + 1)} />
                    }) }
                </div>
                <h3>{ format!("About {}", pet.name) }</h3>
                <dl class="facts">
                    <dt>{ "Breed" }</dt><dd>{ &pet.breed }</dd>
                    <dt>{ "Gender" }</dt><dd>{ pet.gender.map(Gender::label).unwrap_or("Unknown") }</dd>
                    <dt>{ "Distance" }</dt><dd>{ format!("{} km away", pet.distance_km) }</dd>
                </dl>
                <h3>{ "Bio" }</h3>
                <p>{ &pet.bio }</p>
                <h3>{ "My Parent" }</h3>
                <div class="owner">
                    <div>{ &pet.owner.name }</div>
                    <div class="muted">{ pet.owner.gender.map(Gender::label).unwrap_or_default() }</div>
                </div>
            </div>
        </div>
    }
}
