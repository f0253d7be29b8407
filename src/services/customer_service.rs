use uuid::Uuid;

use crate::{
    dto::customers::{
        CreateCustomerRequest, CustomerList, CustomerListQuery, UpdateCustomerRequest,
    },
    error::{AppError, AppResult},
    models::{Customer, EntityStatus},
    response::{ApiResponse, Meta},
    state::AppState,
    store::{Document, Filter},
};

pub async fn list_customers(
    state: &AppState,
    query: CustomerListQuery,
) -> AppResult<ApiResponse<CustomerList>> {
    let items = match query.status {
        Some(status) => {
            state
                .store
                .query::<Customer>(&[Filter::eq("status", status.as_str())])
                .await?
        }
        None => state.store.get_all::<Customer>().await?,
    };

    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success(
        "Customers",
        CustomerList { items },
        Some(meta),
    ))
}

pub async fn get_customer(
    state: &AppState,
    id: &str,
) -> AppResult<ApiResponse<Document<Customer>>> {
    let doc = state
        .store
        .get::<Customer>(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Customer", doc, None))
}

pub async fn create_customer(
    state: &AppState,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Document<Customer>>> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Customer name and email are required".to_string(),
        ));
    }

    let customer = Customer {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        zip_code: payload.zip_code,
        cnpj: payload.cnpj,
        cpf: payload.cpf,
        status: payload.status.unwrap_or(EntityStatus::Active),
    };

    let id = Uuid::new_v4().to_string();
    let doc = state.store.add(&id, customer).await?;
    Ok(ApiResponse::success(
        "Customer created",
        doc,
        Some(Meta::empty()),
    ))
}

pub async fn update_customer(
    state: &AppState,
    id: &str,
    payload: UpdateCustomerRequest,
) -> AppResult<ApiResponse<Document<Customer>>> {
    state
        .store
        .get::<Customer>(id)
        .await?
        .ok_or(AppError::NotFound)?;

    state.store.update::<Customer, _>(id, &payload).await?;

    let doc = state
        .store
        .get::<Customer>(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Updated", doc, Some(Meta::empty())))
}

pub async fn delete_customer(
    state: &AppState,
    id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let removed = state.store.delete::<Customer>(id).await?;
    if !removed {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
