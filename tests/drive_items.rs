mod common;

use common::{client, folder, FakeTransport, BASE};
use reqwest::{Method, StatusCode};
use serde_json::json;
use skydrivex_client::{Auth, CancelToken, DriveItem, GraphError, RawResponse};

fn item(id: &str, name: &str) -> serde_json::Value {
    json!({"id": id, "name": name, "parentReference": {"driveId": "d1", "id": "p1"}})
}

fn accepted_with_location(monitor: &str) -> RawResponse {
    RawResponse::new(StatusCode::ACCEPTED, "").with_header("Location", monitor)
}

#[test]
fn my_drive_then_lookup_by_path() {
    let transport = FakeTransport::new();
    transport
        .push_json(
            200,
            json!({
                "id": "d1",
                "driveType": "personal",
                "quota": {"total": 1024, "used": 256, "remaining": 768, "state": "normal"}
            }),
        )
        .push_json(200, item("i9", "2024 report.pdf"));
    let client = client(&transport, 16);
    let cancel = CancelToken::new();

    let drive = client.my_drive(&cancel).unwrap();
    assert_eq!(drive.id(), "d1");
    assert_eq!(drive.resource().quota.as_ref().and_then(|q| q.used), Some(256));

    let found = drive.get_by_path("/Documents/2024 report.pdf", &cancel).unwrap();
    assert_eq!(found.id(), "i9");
    assert_eq!(found.drive().id, "d1");

    let requests = transport.requests();
    assert_eq!(requests[0].url, format!("{BASE}/me/drive"));
    assert_eq!(
        requests[1].url,
        format!("{BASE}/drives/d1/root:/Documents/2024%20report.pdf")
    );
    assert!(requests.iter().all(|r| r.auth == Auth::Bearer));
}

#[test]
fn create_folder_posts_to_children() {
    let transport = FakeTransport::new();
    transport.push_json(201, json!({"id": "f1", "name": "photos", "folder": {"childCount": 0}}));
    let client = client(&transport, 16);

    let created = folder(&client)
        .create_folder("photos", &CancelToken::new())
        .unwrap();
    assert!(created.resource().is_folder());

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url, format!("{BASE}/drives/d1/items/p1/children"));
    assert_eq!(
        request.json(),
        json!({"name": "photos", "folder": {}, "@microsoft.graph.conflictBehavior": "rename"})
    );
}

#[test]
fn children_pages_follow_next_link() {
    let transport = FakeTransport::new();
    transport
        .push_json(
            200,
            json!({
                "value": [item("a", "a.txt"), item("b", "b.txt")],
                "@odata.nextLink": format!("{BASE}/drives/d1/items/p1/children?$skiptoken=xyz")
            }),
        )
        .push_json(200, json!({"value": [item("c", "c.txt")]}));
    let client = client(&transport, 16);
    let cancel = CancelToken::new();

    let first = folder(&client).list_children(&cancel).unwrap();
    let ids: Vec<_> = first.items.iter().map(|i| i.id().to_string()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(first.has_next());

    let second = first.next(&cancel).unwrap();
    assert_eq!(second.items.len(), 1);
    assert!(!second.has_next());
    assert_eq!(
        transport.requests()[1].url,
        format!("{BASE}/drives/d1/items/p1/children?$skiptoken=xyz")
    );
}

#[test]
fn next_without_link_fails_locally() {
    let transport = FakeTransport::new();
    transport.push_json(200, json!({"value": []}));
    let client = client(&transport, 16);
    let cancel = CancelToken::new();

    let page = folder(&client).list_children(&cancel).unwrap();
    let err = page.next(&cancel).err().unwrap();
    assert!(matches!(err, GraphError::NoNextPage));
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn copy_job_reports_progress_then_resource() {
    let monitor = "https://monitor.test/jobs/42";
    let transport = FakeTransport::new();
    transport
        .push(RawResponse::new(StatusCode::ACCEPTED, "").with_header("Location", monitor))
        .push_json(200, json!({"status": "inProgress", "percentageComplete": 50.0}))
        .push_json(200, json!({"status": "completed", "resourceId": "copy-1"}))
        .push_json(200, item("copy-1", "a (1).txt"));
    let client = client(&transport, 16);
    let cancel = CancelToken::new();
    let source = client.drive_ref("d1").item_ref("src");
    let target = folder(&client);

    let mut job = source.copy(&target, Some("a (1).txt"), &cancel).unwrap();
    assert_eq!(job.monitor_url().as_str(), monitor);
    assert!(!job.is_finished(&cancel).unwrap());
    assert!(job.is_finished(&cancel).unwrap());
    // completed 已缓存，不再查询
    assert!(job.is_finished(&cancel).unwrap());

    let copied = job.get_resource(&cancel).unwrap();
    assert_eq!(copied.id(), "copy-1");

    let requests = transport.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0].url, format!("{BASE}/drives/d1/items/src/copy"));
    assert_eq!(
        requests[0].json(),
        json!({"parentReference": {"driveId": "d1", "id": "p1"}, "name": "a (1).txt"})
    );
    assert_eq!(requests[1].url, monitor);
    assert_eq!(requests[3].url, format!("{BASE}/drives/d1/items/copy-1"));
}

#[test]
fn resource_of_unfinished_job_is_not_fetched() {
    let transport = FakeTransport::new();
    transport
        .push(accepted_with_location("https://monitor.test/j"))
        .push_json(200, json!({"status": "inProgress"}));
    let client = client(&transport, 16);
    let cancel = CancelToken::new();

    let mut job = client
        .drive_ref("d1")
        .item_ref("src")
        .copy(&folder(&client), None, &cancel)
        .unwrap();
    let err = job.get_resource(&cancel).err().unwrap();
    assert!(matches!(err, GraphError::NotFinished));
    // 缓存的状态仍未完成，再次调用不发请求
    let err = job.get_resource(&cancel).err().unwrap();
    assert!(matches!(err, GraphError::NotFinished));
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn completed_job_without_resource_id_is_not_fetched() {
    let transport = FakeTransport::new();
    transport
        .push(accepted_with_location("https://monitor.test/j"))
        .push_json(200, json!({"status": "completed"}));
    let client = client(&transport, 16);
    let cancel = CancelToken::new();

    let mut job = client
        .drive_ref("d1")
        .item_ref("src")
        .copy(&folder(&client), None, &cancel)
        .unwrap();
    let err = job.get_resource(&cancel).err().unwrap();
    assert!(matches!(err, GraphError::NotFinished));
    assert_eq!(transport.request_count(), 2);
    assert_eq!(transport.remaining(), 0);
}

#[test]
fn copy_without_location_header_is_rejected() {
    let transport = FakeTransport::new();
    transport.push(RawResponse::new(StatusCode::ACCEPTED, ""));
    let client = client(&transport, 16);

    let result = client
        .drive_ref("d1")
        .item_ref("src")
        .copy(&folder(&client), None, &CancelToken::new());
    assert!(matches!(result, Err(GraphError::InvalidUrl(_))));
}

#[test]
fn move_update_and_delete() {
    let transport = FakeTransport::new();
    transport
        .push_json(200, item("i1", "renamed.txt"))
        .push_json(200, json!({"id": "i1", "name": "renamed.txt", "description": "notes"}))
        .push(RawResponse::new(StatusCode::NO_CONTENT, ""));
    let client = client(&transport, 16);
    let cancel = CancelToken::new();
    let drive = client.drive_ref("d1");
    let original = drive.item_ref("i1");

    let moved = original
        .move_to(&drive.item_ref("p2"), Some("renamed.txt"), &cancel)
        .unwrap();
    assert_eq!(moved.resource().name.as_deref(), Some("renamed.txt"));
    // 原句柄的快照不受影响
    assert_eq!(original.resource().name, None);

    let patch = DriveItem {
        description: Some("notes".into()),
        ..Default::default()
    };
    let updated = moved.update(&patch, &cancel).unwrap();
    assert_eq!(updated.resource().description.as_deref(), Some("notes"));

    updated.delete(&cancel).unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::PATCH);
    assert_eq!(
        requests[0].json(),
        json!({"parentReference": {"driveId": "d1", "id": "p2"}, "name": "renamed.txt"})
    );
    assert_eq!(requests[1].method, Method::PATCH);
    assert_eq!(requests[1].json(), json!({"description": "notes"}));
    assert_eq!(requests[2].method, Method::DELETE);
    assert_eq!(requests[2].url, format!("{BASE}/drives/d1/items/i1"));
}

#[test]
fn delete_surfaces_remote_error() {
    let transport = FakeTransport::new();
    transport.push_json(
        404,
        json!({"error": {"code": "itemNotFound", "message": "The resource could not be found."}}),
    );
    let client = client(&transport, 16);

    let err = folder(&client).delete(&CancelToken::new()).unwrap_err();
    assert_eq!(err.remote_code(), Some("itemNotFound"));
    assert_eq!(err.to_string(), "itemNotFound-The resource could not be found.");
}

#[test]
fn download_prefers_preauthorized_url() {
    let transport = FakeTransport::new();
    transport
        .push_json(
            200,
            json!({
                "id": "i1",
                "name": "a.txt",
                "file": {},
                "@microsoft.graph.downloadUrl": "https://cdn.test/a.txt?sig=1"
            }),
        )
        .push(RawResponse::new(StatusCode::OK, "hello"));
    let client = client(&transport, 16);
    let cancel = CancelToken::new();

    let file = client.drive_ref("d1").get("i1", &cancel).unwrap();
    let mut sink = Vec::new();
    assert_eq!(file.download(&mut sink, &cancel).unwrap(), 5);
    assert_eq!(sink, b"hello");

    let request = &transport.requests()[1];
    assert_eq!(request.url, "https://cdn.test/a.txt?sig=1");
    assert_eq!(request.auth, Auth::None);
}

#[test]
fn download_falls_back_to_content_endpoint() {
    let transport = FakeTransport::new();
    transport.push(RawResponse::new(StatusCode::PARTIAL_CONTENT, "part"));
    let client = client(&transport, 16);
    let mut sink = Vec::new();

    let written = client
        .drive_ref("d1")
        .item_ref("i1")
        .download(&mut sink, &CancelToken::new())
        .unwrap();
    assert_eq!(written, 4);

    let request = &transport.requests()[0];
    assert_eq!(request.url, format!("{BASE}/drives/d1/items/i1/content"));
    assert_eq!(request.auth, Auth::Bearer);
}

#[test]
fn download_rejects_folders_and_bad_status() {
    let transport = FakeTransport::new();
    transport
        .push_json(200, json!({"id": "f1", "folder": {"childCount": 3}}))
        .push(RawResponse::new(StatusCode::NOT_FOUND, ""));
    let client = client(&transport, 16);
    let cancel = CancelToken::new();
    let drive = client.drive_ref("d1");
    let mut sink = Vec::new();

    let folder_item = drive.get("f1", &cancel).unwrap();
    assert!(matches!(
        folder_item.download(&mut sink, &cancel),
        Err(GraphError::DownloadUrlNotFound)
    ));

    let err = drive
        .item_ref("gone")
        .download(&mut sink, &cancel)
        .unwrap_err();
    assert!(matches!(err, GraphError::UnexpectedStatus { status: 404 }));
    assert!(sink.is_empty());
}
