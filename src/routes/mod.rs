pub mod auth;
pub mod books;
pub mod health;
pub mod import_export;
pub mod search;
pub mod users;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::me),
    )
    .service(
        // Literal paths are registered ahead of the "/{id}" routes so that
        // "/export" and friends never get captured as a book id.
        web::scope("/books")
            .service(import_export::preview_import)
            .service(import_export::commit_import)
            .service(import_export::export_collection)
            .service(search::search_books)
            .service(search::get_google_book)
            .service(search::add_google_book)
            .service(books::get_books)
            .service(books::create_book)
            .service(books::get_book)
            .service(books::update_book)
            .service(books::delete_book),
    )
    .service(
        web::scope("/users")
            .service(users::search_users)
            .service(users::get_friends)
            .service(users::add_friend)
            .service(users::remove_friend)
            .service(users::get_friend_books)
            .service(users::export_friend_books),
    );
}
