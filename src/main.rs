#[macro_use]
extern crate rocket;

use cura_backend::api;
use cura_backend::config::{create_app_state, create_cors, init_logger, load_environment};

#[get("/")]
fn index() -> &'static str {
    "CURA backend is running"
}

#[launch]
async fn rocket() -> _ {
    load_environment();
    init_logger();

    let state = create_app_state()
        .await
        .expect("Failed to initialize application state");
    let cors = create_cors().expect("Failed to create CORS options");

    rocket::build()
        .manage(state)
        .attach(cors)
        .mount("/", routes![index])
        .mount(
            "/collections",
            routes![
                api::collections::create_collection,
                api::collections::list_collections,
                api::collections::get_collection,
                api::collections::get_collection_videos,
                api::collections::get_collection_channel_info,
                api::collections::import_videos,
            ],
        )
        .mount("/videos", routes![api::videos::parse_video])
}
