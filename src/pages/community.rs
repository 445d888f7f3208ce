use std::collections::BTreeMap;

use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::posts::{sort_feed, FeedOrder, Post, PostDraft, DOG_BREEDS, POST_CATEGORIES};

#[derive(Properties, PartialEq)]
pub struct CommunityProps {
    pub posts: Vec<Post>,
    pub on_toggle_like: Callback<String>,
    pub on_toggle_bookmark: Callback<String>,
    pub on_create: Callback<PostDraft>,
    pub comments: BTreeMap<String, Vec<String>>,
    pub on_comment: Callback<(String, String)>,
}

#[derive(Clone, PartialEq)]
enum View {
    Feed,
    Detail(String),
    Compose,
}

#[function_component(CommunityPage)]
pub fn community_page(props: &CommunityProps) -> Html {
    let view = use_state(|| View::Feed);
    let order = use_state(|| FeedOrder::Trending);

    let open = |next: View| {
        let view = view.clone();
        Callback::from(move |_: MouseEvent| view.set(next.clone()))
    };

    match &*view {
        View::Compose => {
            let on_submit = {
                let view = view.clone();
                let on_create = props.on_create.clone();
                Callback::from(move |draft: PostDraft| {
                    on_create.emit(draft);
                    view.set(View::Feed);
                })
            };
            html! { <ComposePost on_submit={on_submit} on_cancel={open(View::Feed)} /> }
        }
        View::Detail(id) => match props.posts.iter().find(|post| &post.id == id) {
            Some(post) => {
                let comments = props.comments.get(&post.id).cloned().unwrap_or_default();
                let on_add = {
                    let id = post.id.clone();
                    let on_comment = props.on_comment.clone();
                    Callback::from(move |text: String| on_comment.emit((id.clone(), text)))
                };
                html! {
                    <div class="post-detail">
                        <button class="icon-button" onclick={open(View::Feed)}>{ "←" }</button>
                        { render_post(post, props, None) }
                        <CommentThread comments={comments} on_add={on_add} />
                    </div>
                }
            }
            None => html! { <p class="placeholder">{ "This post is no longer available." }</p> },
        },
        View::Feed => {
            let mut posts = props.posts.clone();
            sort_feed(&mut posts, *order);
            let tab = |label: &'static str, value: FeedOrder| {
                let order = order.clone();
                let class = if *order == value { "tab active" } else { "tab" };
                html! {
                    <button class={class} onclick={Callback::from(move |_: MouseEvent| order.set(value))}>
                        { label }
                    </button>
                }
            };

            html! {
                <div class="community">
                    <header class="page-header">
                        <h1>{ "Community" }</h1>
                        <button class="btn-primary" onclick={open(View::Compose)}>{ "New post" }</button>
                    </header>
                    <div class="tabs">
                        { tab("Trending", FeedOrder::Trending) }
                        { tab("Recent", FeedOrder::Recent) }
                    </div>
                    <div class="post-list">
                        { for posts.iter().map(|post| render_post(post, props, Some(open(View::Detail(post.id.clone()))))) }
                    </div>
                </div>
            }
        }
    }
}

fn render_post(post: &Post, props: &CommunityProps, on_open: Option<Callback<MouseEvent>>) -> Html {
    let like = {
        let id = post.id.clone();
        let on_toggle_like = props.on_toggle_like.clone();
        Callback::from(move |_: MouseEvent| on_toggle_like.emit(id.clone()))
    };
    let bookmark = {
        let id = post.id.clone();
        let on_toggle_bookmark = props.on_toggle_bookmark.clone();
        Callback::from(move |_: MouseEvent| on_toggle_bookmark.emit(id.clone()))
    };

    html! {
        <article key={post.id.clone()} class="post-card">
            <div class="post-meta">
                <span class="pet-type">{ &post.pet_type }</span>
                <span class="muted">{ &post.time_since }</span>
            </div>
            <h3 class="post-title" onclick={on_open}>{ &post.title }</h3>
            <p>{ &post.content }</p>
            <div class="tags">
                { for post.tags.iter().map(|tag| html! { <span class="tag">{ format!("#{tag}") }</span> }) }
            </div>
            <div class="post-actions">
                <button class={classes!("like", post.is_liked.then_some("active"))} onclick={like}>
                    { format!("♥ {}", post.likes_count) }
                </button>
                <span class="muted">{ format!("💬 {}", post.comments_count) }</span>
                <button class={classes!("bookmark", post.is_bookmarked.then_some("active"))} onclick={bookmark}>
                    { if post.is_bookmarked { "Saved" } else { "Save" } }
                </button>
            </div>
        </article>
    }
}

#[derive(Properties, PartialEq)]
struct CommentProps {
    comments: Vec<String>,
    on_add: Callback<String>,
}

#[function_component(CommentThread)]
fn comment_thread(props: &CommentProps) -> Html {
    let draft = use_state(String::new);

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |event: InputEvent| {
            draft.set(event.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let on_submit = {
        let draft = draft.clone();
        let on_add = props.on_add.clone();
        Callback::from(move |_: MouseEvent| {
            if draft.trim().is_empty() {
                return;
            }
            on_add.emit((*draft).clone());
            draft.set(String::new());
        })
    };

    html! {
        <section class="comments">
            <h2>{ "Comments" }</h2>
            <ul>
                { for props.comments.iter().enumerate().map(|(index, comment)| html! {
                    <li key={index}>{ comment }</li>
                }) }
            </ul>
            <input class="input" placeholder="Add a comment" value={(*draft).clone()} oninput={on_input} />
            <button class="btn-primary" onclick={on_submit}>{ "Add Comment" }</button>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct ComposeProps {
    on_submit: Callback<PostDraft>,
    on_cancel: Callback<MouseEvent>,
}

#[function_component(ComposePost)]
fn compose_post(props: &ComposeProps) -> Html {
    let draft = use_state(PostDraft::default);
    let error = use_state(|| None::<String>);

    let edit = |apply: fn(&mut PostDraft, String), value_of: fn(&Event) -> String| {
        let draft = draft.clone();
        Callback::from(move |event: Event| {
            let mut next = (*draft).clone();
            apply(&mut next, value_of(&event));
            draft.set(next);
        })
    };
    let on_title = edit(
        |d, v| d.title = v,
        |e| e.target_unchecked_into::<HtmlInputElement>().value(),
    );
    let on_content = edit(
        |d, v| d.content = v,
        |e| e.target_unchecked_into::<HtmlTextAreaElement>().value(),
    );
    let on_breed = edit(
        |d, v| d.breed = v,
        |e| e.target_unchecked_into::<HtmlSelectElement>().value(),
    );

    let submit = {
        let draft = draft.clone();
        let error = error.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |_: MouseEvent| match draft.validate() {
            Ok(()) => on_submit.emit((*draft).clone()),
            Err(err) => error.set(Some(err.to_string())),
        })
    };

    html! {
        <div class="compose">
            <header class="page-header">
                <button class="icon-button" onclick={props.on_cancel.clone()}>{ "←" }</button>
                <h1>{ "Create post" }</h1>
                <button class="btn-primary" onclick={submit}>{ "Post" }</button>
            </header>
            {
                match &*error {
                    Some(message) => html! { <p class="error">{ message }</p> },
                    None => html! {},
                }
            }
            <input class="input" placeholder="Title" value={draft.title.clone()} onchange={on_title} />
            <textarea class="input" placeholder="Share your story or question…" value={draft.content.clone()} onchange={on_content} />
            <select class="input" onchange={on_breed}>
                <option value="" selected={draft.breed.is_empty()}>{ "Select a breed" }</option>
                { for DOG_BREEDS.iter().map(|breed| html! {
                    <option value={*breed} selected={draft.breed == *breed}>{ *breed }</option>
                }) }
            </select>
            <div class="categories">
                { for POST_CATEGORIES.iter().map(|category| {
                    let selected = draft.categories.iter().any(|c| c == category);
                    let onclick = {
                        let draft = draft.clone();
                        Callback::from(move |_: MouseEvent| {
                            let mut next = (*draft).clone();
                            next.toggle_category(category);
                            draft.set(next);
                        })
                    };
                    html! {
                        <button class={classes!("chip", selected.then_some("selected"))} onclick={onclick}>
                            { *category }
                        </button>
                    }
                }) }
            </div>
        </div>
    }
}
