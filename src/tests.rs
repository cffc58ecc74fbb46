//! End-to-end tests driving the MMS client against real sockets

use crate::client::{
    ClientBuilder, CommunicationFault, CompletionToken, CompletionTokens, Dispatch, DropReason,
    Endpoint, MmsError, MmsManager, MmsResult, SERVICE_NAME, ServiceDirectory, ServiceLocator,
    ServiceUnavailable,
};
use crate::codec::{CodecError, Frame};
use crate::connection::Connection;
use crate::datatypes::{DownloadMessage, SendMessage};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// Accept one connection and read every frame the client wrote on it
    async fn accept_frames(listener: &TcpListener) -> Vec<Frame> {
        let (socket, _) = listener.accept().await.unwrap();
        let mut connection = Connection::new(socket);
        let mut frames = Vec::new();
        while let Some(frame) = connection.read_frame().await.unwrap() {
            frames.push(frame);
        }
        frames
    }

    // Both helpers are generic over the locator, so a manager whose futures
    // stop being `Send` no longer compiles here.
    fn spawn_send<L>(
        manager: Arc<MmsManager<L>>,
        payload: Vec<u8>,
    ) -> JoinHandle<MmsResult<Dispatch>>
    where
        L: ServiceLocator + Send + Sync + 'static,
    {
        tokio::spawn(async move {
            manager
                .send_message(payload, None, CompletionTokens::sent("sent"))
                .await
        })
    }

    fn spawn_download<L>(
        manager: Arc<MmsManager<L>>,
        location_url: String,
    ) -> JoinHandle<MmsResult<Dispatch>>
    where
        L: ServiceLocator + Send + Sync + 'static,
    {
        tokio::spawn(async move {
            manager
                .download_message(&location_url, Some("T1"), None)
                .await
        })
    }

    #[tokio::test]
    async fn send_reaches_service_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let manager = ClientBuilder::tcp(listener.local_addr().unwrap());

        // 200 non-zero bytes, no location, one completion token
        let payload: Vec<u8> = (0..200).map(|i| (i % 250 + 1) as u8).collect();
        let token = CompletionToken::from("sent:200");

        let (dispatch, frames) = tokio::join!(
            manager.send_message(payload.clone(), None, CompletionTokens::sent(token.clone())),
            accept_frames(&listener),
        );

        assert!(dispatch.unwrap().is_forwarded());
        assert_eq!(
            frames,
            vec![Frame::SendMessage(Box::new(
                SendMessage::new(payload).with_tokens(CompletionTokens::sent(token))
            ))]
        );
    }

    #[tokio::test]
    async fn download_reaches_service_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let manager = ClientBuilder::tcp(listener.local_addr().unwrap());

        let (dispatch, frames) = tokio::join!(
            manager.download_message(
                "http://mmsc.example.net/retrieve?id=0042",
                Some("T18a3c7e0"),
                Some(CompletionToken::from("downloaded")),
            ),
            accept_frames(&listener),
        );

        assert!(dispatch.unwrap().is_forwarded());
        assert_eq!(
            frames,
            vec![Frame::DownloadMessage(
                DownloadMessage::new("http://mmsc.example.net/retrieve?id=0042")
                    .with_transaction_id("T18a3c7e0")
                    .with_downloaded("downloaded")
            )]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn send_reaches_service_over_unix_socket() {
        use tokio::net::UnixListener;

        let path =
            std::env::temp_dir().join(format!("mms-client-test-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path).unwrap();
        let manager = ClientBuilder::unix(&path);

        let receive = async {
            let (socket, _) = listener.accept().await.unwrap();
            Connection::new(socket).read_frame().await.unwrap()
        };

        let (dispatch, frame) = tokio::join!(
            manager.send_message(
                vec![0x8C, 0x80, 0x98],
                Some("content://mms/outbox/1"),
                CompletionTokens::none()
            ),
            receive,
        );
        let _ = std::fs::remove_file(&path);

        assert!(dispatch.unwrap().is_forwarded());
        assert_eq!(
            frame,
            Some(Frame::SendMessage(Box::new(
                SendMessage::new(vec![0x8C, 0x80, 0x98]).with_location_url("content://mms/outbox/1")
            )))
        );
    }

    #[tokio::test]
    async fn concurrent_calls_resolve_independently() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let manager = ClientBuilder::tcp(listener.local_addr().unwrap());

        let receive = async {
            let mut frames = Vec::new();
            for _ in 0..3 {
                frames.extend(accept_frames(&listener).await);
            }
            frames
        };

        let (a, b, c, frames) = tokio::join!(
            manager.download_message("http://mmsc/a", None, None),
            manager.download_message("http://mmsc/b", None, None),
            manager.send_message(vec![0x01], None, CompletionTokens::none()),
            receive,
        );

        assert!(a.unwrap().is_forwarded());
        assert!(b.unwrap().is_forwarded());
        assert!(c.unwrap().is_forwarded());
        assert_eq!(frames.len(), 3);
    }

    #[tokio::test]
    async fn unreachable_service_is_a_silent_no_op() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let manager = ClientBuilder::tcp(addr);
        let dispatch = manager
            .download_message("http://mmsc/1", None, Some(CompletionToken::from("downloaded")))
            .await
            .unwrap();

        assert!(matches!(
            dispatch,
            Dispatch::Dropped(DropReason::ServiceUnavailable(
                ServiceUnavailable::Unreachable { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn invalid_arguments_never_touch_the_service() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let manager = ClientBuilder::tcp(listener.local_addr().unwrap());

        let send = manager
            .send_message(Vec::<u8>::new(), None, CompletionTokens::sent("sent"))
            .await;
        assert!(matches!(send, Err(MmsError::InvalidArgument(_))));

        let download = manager.download_message("", None, None).await;
        assert!(matches!(download, Err(MmsError::InvalidArgument(_))));

        // Nothing connected, so nothing is waiting to be accepted
        let pending = tokio::time::timeout(Duration::from_millis(50), listener.accept()).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn oversize_payload_is_dropped_without_connecting() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let manager = ClientBuilder::tcp(listener.local_addr().unwrap());

        let payload = vec![0x8C; 3 * 1024 * 1024];
        let dispatch = manager
            .send_message(payload, None, CompletionTokens::sent("sent"))
            .await
            .unwrap();
        assert!(matches!(
            dispatch,
            Dispatch::Dropped(DropReason::CommunicationFault(CommunicationFault::Codec(
                CodecError::FieldValidation {
                    field: "payload",
                    ..
                }
            )))
        ));

        let pending = tokio::time::timeout(Duration::from_millis(50), listener.accept()).await;
        assert!(pending.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn spawned_calls_reach_service_from_worker_threads() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let manager = Arc::new(ClientBuilder::tcp(listener.local_addr().unwrap()));

        let receive = tokio::spawn(async move {
            let mut frames = Vec::new();
            for _ in 0..4 {
                frames.extend(accept_frames(&listener).await);
            }
            frames
        });

        let handles = vec![
            spawn_send(manager.clone(), vec![0x8C, 0x01]),
            spawn_send(manager.clone(), vec![0x8C, 0x02]),
            spawn_download(manager.clone(), "http://mmsc/a".to_string()),
            spawn_download(manager.clone(), "http://mmsc/b".to_string()),
        ];
        for handle in handles {
            assert!(handle.await.unwrap().unwrap().is_forwarded());
        }

        let frames = receive.await.unwrap();
        assert_eq!(frames.len(), 4);
        let sends = frames
            .iter()
            .filter(|frame| matches!(frame, Frame::SendMessage(_)))
            .count();
        assert_eq!(sends, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn default_manager_serves_spawned_calls() {
        let handles: Vec<_> = (0..4u8)
            .map(|i| {
                tokio::spawn(async move {
                    let manager = MmsManager::get_default();
                    if i % 2 == 0 {
                        manager
                            .send_message(vec![0x8C, i], None, CompletionTokens::none())
                            .await
                    } else {
                        manager
                            .download_message(&format!("http://mmsc/{i}"), None, None)
                            .await
                    }
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
    }

    #[tokio::test]
    async fn default_manager_never_raises_for_valid_input() {
        // Whether or not a service listens at the default endpoint, a
        // well-formed call returns normally
        let result = MmsManager::get_default()
            .send_message(vec![0x8C], None, CompletionTokens::none())
            .await;
        assert!(result.is_ok());
    }

    /// Writer collecting formatted log output
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn unresolvable_service_logs_one_error() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::ERROR)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let manager = MmsManager::new(ServiceDirectory::new());
        let dispatch = manager
            .download_message("http://mmsc/1", None, None)
            .await
            .unwrap();

        assert!(matches!(
            dispatch,
            Dispatch::Dropped(DropReason::ServiceUnavailable(
                ServiceUnavailable::NotRegistered { ref name }
            )) if name == SERVICE_NAME
        ));

        let output = logs.contents();
        assert_eq!(output.matches("Can not find MMS service").count(), 1);
        assert!(output.contains("ERROR"));
    }

    #[tokio::test]
    async fn re_registering_an_endpoint_takes_effect_on_next_call() {
        let old = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let old_addr = old.local_addr().unwrap();
        drop(old);

        let new = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let mut directory = ServiceDirectory::new();
        directory.register(SERVICE_NAME, Endpoint::Tcp(old_addr));
        let first = MmsManager::new(directory.clone())
            .download_message("http://mmsc/1", None, None)
            .await
            .unwrap();
        assert!(!first.is_forwarded());

        directory.register(SERVICE_NAME, Endpoint::Tcp(new.local_addr().unwrap()));
        let manager = MmsManager::new(directory);
        let (second, frames) = tokio::join!(
            manager.download_message("http://mmsc/1", None, None),
            accept_frames(&new),
        );
        assert!(second.unwrap().is_forwarded());
        assert_eq!(frames.len(), 1);
    }
}
