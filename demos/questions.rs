use huddle_http::{ClientOptions, HuddleApi, ServiceUrls};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let email = std::env::var("HUDDLE_USER_EMAIL")?;
    let meeting_id = std::env::var("HUDDLE_MEETING_ID")?;

    let api = HuddleApi::new(&ServiceUrls::from_env(), ClientOptions::default())?;

    let set = api.get_question(&email, &meeting_id).await;
    for question in &set.questions {
        match question.for_user {
            Some(user) => println!("[{}] (user {user}) {}", question.id, question.text),
            None => println!("[{}] {}", question.id, question.text),
        }
    }

    for meeting in api.get_user_meetings(&email).await? {
        println!("meeting: {meeting}");
    }

    Ok(())
}
