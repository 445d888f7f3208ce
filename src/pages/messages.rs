use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::chat::{sample_conversations, sample_thread, Author, Conversation, Thread};

#[function_component(MessagesPage)]
pub fn messages_page() -> Html {
    let open = use_state(|| None::<Thread>);
    let query = use_state(String::new);

    if let Some(thread) = (*open).clone() {
        let back = {
            let open = open.clone();
            Callback::from(move |_: MouseEvent| open.set(None))
        };
        let on_send = {
            let open = open.clone();
            Callback::from(move |text: String| {
                if let Some(mut next) = (*open).clone() {
                    if next.send(&text, js_sys::Date::now()).is_some() {
                        open.set(Some(next));
                    }
                }
            })
        };
        return html! { <ChatView thread={thread} on_back={back} on_send={on_send} /> };
    }

    let on_search = {
        let query = query.clone();
        Callback::from(move |event: InputEvent| {
            query.set(event.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let needle = query.trim().to_lowercase();
    let conversations: Vec<Conversation> = sample_conversations()
        .into_iter()
        .filter(|c| {
            needle.is_empty()
                || c.pet_name.to_lowercase().contains(&needle)
                || c.owner_name.to_lowercase().contains(&needle)
        })
        .collect();

    html! {
        <div class="messages">
            <header class="page-header">
                <h1>{ "Messages" }</h1>
                <input class="input search" placeholder="Search" value={(*query).clone()} oninput={on_search} />
            </header>
            <ul class="conversation-list">
                { for conversations.into_iter().map(|conversation| {
                    let onclick = {
                        let open = open.clone();
                        let pet_id = conversation.pet_id.clone();
                        Callback::from(move |_: MouseEvent| {
                            open.set(sample_thread(&pet_id, js_sys::Date::now()));
                        })
                    };
                    html! {
                        <li key={conversation.pet_id.clone()} class="conversation" onclick={onclick}>
                            <img class="avatar" src={conversation.image.clone()} alt={conversation.pet_name.clone()} />
                            <div class="conversation-body">
                                <div class="conversation-head">
                                    <span class="name">{ format!("{} & {}", conversation.pet_name, conversation.owner_name) }</span>
                                    <span class="muted">{ &conversation.time_label }</span>
                                </div>
                                <p class="last-message">{ &conversation.last_message }</p>
                            </div>
                            {
                                if conversation.unread > 0 {
                                    html! { <span class="badge">{ conversation.unread.to_string() }</span> }
                                } else {
                                    html! {}
                                }
                            }
                        </li>
                    }
                }) }
            </ul>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ChatProps {
    thread: Thread,
    on_back: Callback<MouseEvent>,
    on_send: Callback<String>,
}

#[function_component(ChatView)]
fn chat_view(props: &ChatProps) -> Html {
    let draft = use_state(String::new);

    let send = {
        let draft = draft.clone();
        let on_send = props.on_send.clone();
        move || {
            on_send.emit((*draft).clone());
            draft.set(String::new());
        }
    };
    let on_input = {
        let draft = draft.clone();
        Callback::from(move |event: InputEvent| {
            draft.set(event.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let on_key = {
        let send = send.clone();
        Callback::from(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                send();
            }
        })
    };
    let on_click = Callback::from(move |_: MouseEvent| send());

    html! {
        <div class="chat">
            <header class="page-header">
                <button class="icon-button" onclick={props.on_back.clone()}>{ "←" }</button>
                <h2>{ "Chat" }</h2>
            </header>
            <div class="chat-log">
                { for props.thread.messages().iter().map(|message| {
                    let class = match message.author {
                        Author::Me => "bubble mine",
                        Author::Pet => "bubble theirs",
                    };
                    html! {
                        <div key={message.id.clone()} class={class}>
                            <p>{ &message.text }</p>
                            <span class="time">{ time_label(message.sent_at) }</span>
                        </div>
                    }
                }) }
            </div>
            <div class="chat-input">
                <input class="input" placeholder="Type a message…" value={(*draft).clone()} oninput={on_input} onkeypress={on_key} />
                <button class="btn-primary" onclick={on_click}>{ "Send" }</button>
            </div>
        </div>
    }
}

fn time_label(sent_at: f64) -> String {
    let date = js_sys::Date::new(&sent_at.into());
    format!("{:02}:{:02}", date.get_hours(), date.get_minutes())
}
