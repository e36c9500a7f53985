use sea_orm::*;
use uuid::Uuid;

use crate::models::{activity, link, participant, trip};

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Assume an empty database; re-running the seed is a no-op.
    if trip::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let now = chrono::Utc::now();
    let starts_at = now + chrono::Duration::days(30);
    let ends_at = starts_at + chrono::Duration::days(4);

    let trip_id = Uuid::new_v4().to_string();
    let demo_trip = trip::ActiveModel {
        id: Set(trip_id.clone()),
        destination: Set("Florianópolis, SC".to_owned()),
        starts_at: Set(starts_at.to_rfc3339()),
        ends_at: Set(ends_at.to_rfc3339()),
        is_confirmed: Set(true),
        created_at: Set(now.to_rfc3339()),
    };
    trip::Entity::insert(demo_trip).exec(db).await?;

    let owner = participant::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(Some("John Doe".to_owned())),
        email: Set("john.doe@example.com".to_owned()),
        is_confirmed: Set(true),
        is_owner: Set(true),
        trip_id: Set(trip_id.clone()),
    };
    participant::Entity::insert(owner).exec(db).await?;

    let guests: Vec<participant::ActiveModel> = ["alice@example.com", "bob@example.com"]
        .into_iter()
        .map(|email| participant::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(None),
            email: Set(email.to_owned()),
            is_confirmed: Set(false),
            is_owner: Set(false),
            trip_id: Set(trip_id.clone()),
        })
        .collect();
    participant::Entity::insert_many(guests).exec(db).await?;

    let activities = [
        (0, "Check-in no hotel"),
        (1, "Trilha na Lagoinha do Leste"),
        (2, "Passeio de barco"),
    ];
    for (offset, title) in activities {
        let entry = activity::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(title.to_owned()),
            occurs_at: Set((starts_at + chrono::Duration::days(offset)).to_rfc3339()),
            is_done: Set(false),
            trip_id: Set(trip_id.clone()),
        };
        activity::Entity::insert(entry).exec(db).await?;
    }

    let reservation = link::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        title: Set("Reserva do Airbnb".to_owned()),
        url: Set("https://www.airbnb.com.br/rooms/demo".to_owned()),
        trip_id: Set(trip_id),
    };
    link::Entity::insert(reservation).exec(db).await?;

    Ok(())
}
