//! Verification email template.

use ax_core::otp::OtpCode;

pub struct OtpEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Build the branded verification email around a freshly issued code.
pub fn otp_email(code: &OtpCode) -> OtpEmail {
    let subject = "Your Axys Verification Code".to_owned();

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Axys Verification Code</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f5f5f5;">
  <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff; padding: 40px 20px;">
    <div style="text-align: center; margin-bottom: 40px;">
      <h1 style="color: #000000; font-size: 32px; margin: 0; font-weight: bold;">AXYS</h1>
      <p style="color: #666666; font-size: 16px; margin: 10px 0 0 0;">Banking for Neo Thinkers</p>
    </div>
    <div style="text-align: center;">
      <h2 style="color: #000000; font-size: 24px; margin-bottom: 20px;">Verify Your Email</h2>
      <p style="color: #333333; font-size: 16px; line-height: 1.5; margin-bottom: 30px;">
        Please use the verification code below to continue:
      </p>
      <div style="background-color: #000000; padding: 30px; border-radius: 12px; margin: 30px 0;">
        <h1 style="color: #ffffff; font-size: 36px; letter-spacing: 8px; margin: 0; font-weight: bold;">{code}</h1>
      </div>
      <p style="color: #666666; font-size: 14px; margin-bottom: 30px;">
        This code will expire in <strong>5 minutes</strong>.
      </p>
      <div style="background-color: #f8f9fa; padding: 20px; border-radius: 8px; margin: 30px 0;">
        <p style="color: #666666; font-size: 14px; margin: 0;">
          <strong>Security Tip:</strong> Never share this code with anyone. Axys will never ask for your verification code via phone or email.
        </p>
      </div>
    </div>
    <div style="text-align: center; margin-top: 40px; padding-top: 20px; border-top: 1px solid #eeeeee;">
      <p style="color: #999999; font-size: 12px; margin: 0;">
        This email was sent by the Axys Banking App<br>
        If you didn't request this code, please ignore this email.
      </p>
    </div>
  </div>
</body>
</html>"#
    );

    let text = format!(
        "AXYS - Banking for Neo Thinkers\n\n\
         Verify Your Email\n\n\
         Please use the verification code below to continue:\n\n\
         Verification Code: {code}\n\n\
         This code will expire in 5 minutes.\n\n\
         Security Tip: Never share this code with anyone. Axys will never ask for your verification code via phone or email.\n\n\
         This email was sent by the Axys Banking App\n\
         If you didn't request this code, please ignore this email.\n"
    );

    OtpEmail {
        subject,
        html,
        text,
    }
}
